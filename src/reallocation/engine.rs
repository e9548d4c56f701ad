//! Reallocation of forecast activity from acute to community settings
//!
//! The acute and community forecasts are outer-joined on segment and year,
//! the service line's shift ratio is attached, and from the first of January
//! of the effective year onward that share of acute activity moves to
//! community. Earlier years pass through unchanged.

use crate::activity::{DimensionKey, Domain};
use crate::assumptions::AssumptionTable;
use crate::error::{ModelError, Result};
use crate::projection::ForecastTable;
use super::combined::{CombinedActivityRecord, CombinedTable};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Year the business transformation takes effect
pub const DEFAULT_EFFECTIVE_YEAR: i32 = 2025;

/// Configuration for a reallocation run
#[derive(Debug, Clone)]
pub struct ReallocationConfig {
    /// Rows dated on or after 1 January of this year are reallocated
    pub effective_year: i32,
}

impl Default for ReallocationConfig {
    fn default() -> Self {
        Self {
            effective_year: DEFAULT_EFFECTIVE_YEAR,
        }
    }
}

/// Outcome of joining one segment-year across both settings
///
/// A side missing from the join contributes zero activity.
#[derive(Debug, Clone, Default)]
struct JoinedRow {
    acute: Option<f64>,
    community: Option<f64>,
}

/// Applies the community shift policy to a pair of forecasts
#[derive(Debug, Clone, Default)]
pub struct ReallocationEngine {
    config: ReallocationConfig,
}

impl ReallocationEngine {
    pub fn new(config: ReallocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReallocationConfig {
        &self.config
    }

    /// Combine both forecasts and move the configured share of acute activity
    pub fn reallocate(
        &self,
        acute: &ForecastTable,
        community: &ForecastTable,
        assumptions: &AssumptionTable,
    ) -> Result<CombinedTable> {
        check_domain(acute, Domain::Acute)?;
        check_domain(community, Domain::Community)?;

        let effective_date = first_of_january(self.config.effective_year)?;

        let (order, joined) = outer_join(acute, community)?;

        let mut acute_only = 0usize;
        let mut community_only = 0usize;
        let mut missing_service_lines: BTreeSet<&str> = BTreeSet::new();

        let mut records = Vec::with_capacity(order.len());
        for &(key, year) in &order {
            let row = &joined[&(key, year)];
            match (row.acute, row.community) {
                (Some(_), None) => acute_only += 1,
                (None, Some(_)) => community_only += 1,
                _ => {}
            }
            let acute_activity = row.acute.unwrap_or(0.0);
            let community_activity = row.community.unwrap_or(0.0);

            let ratio = assumptions.shift_for(&key.service_line);
            if ratio.is_none() {
                missing_service_lines.insert(key.service_line.as_str());
            }

            let in_scope = first_of_january(year)? >= effective_date;
            let (revised_acute, revised_community) = if in_scope {
                let shift = acute_activity * ratio.unwrap_or(0.0);
                (acute_activity - shift, community_activity + shift)
            } else {
                (acute_activity, community_activity)
            };

            records.push(CombinedActivityRecord {
                hospital_name: key.provider.clone(),
                region: key.region.clone(),
                service_line: key.service_line.clone(),
                sex: key.sex.clone(),
                age_band: key.age_band.clone(),
                year,
                acute_activity,
                community_activity,
                revised_acute_activity: revised_acute,
                revised_community_activity: revised_community,
            });
        }

        if acute_only > 0 || community_only > 0 {
            log::info!(
                "Reallocation join: {} acute-only and {} community-only rows, missing side set to zero",
                acute_only,
                community_only
            );
        }
        if !missing_service_lines.is_empty() {
            log::warn!(
                "No shift assumption for service line(s) {:?}; no activity reallocated for them",
                missing_service_lines
            );
        }

        log::debug!(
            "Reallocation: {} combined rows, effective from {}",
            records.len(),
            effective_date
        );

        Ok(CombinedTable::new(self.config.effective_year, records))
    }
}

/// Reallocate with an explicit effective year
pub fn reallocate(
    acute: &ForecastTable,
    community: &ForecastTable,
    assumptions: &AssumptionTable,
    effective_year: i32,
) -> Result<CombinedTable> {
    ReallocationEngine::new(ReallocationConfig { effective_year }).reallocate(
        acute,
        community,
        assumptions,
    )
}

type JoinKey<'a> = (&'a DimensionKey, i32);

/// Full outer join on segment and year, keeping first-seen order
fn outer_join<'a>(
    acute: &'a ForecastTable,
    community: &'a ForecastTable,
) -> Result<(Vec<JoinKey<'a>>, HashMap<JoinKey<'a>, JoinedRow>)> {
    let mut order = Vec::with_capacity(acute.len().max(community.len()));
    let mut joined: HashMap<JoinKey<'a>, JoinedRow> = HashMap::with_capacity(order.capacity());

    for (table, domain) in [(acute, Domain::Acute), (community, Domain::Community)] {
        for record in &table.records {
            let join_key = (&record.key, record.year);
            let row = joined.entry(join_key).or_insert_with(|| {
                order.push(join_key);
                JoinedRow::default()
            });
            let slot = match domain {
                Domain::Acute => &mut row.acute,
                Domain::Community => &mut row.community,
            };
            if slot.replace(record.activity).is_some() {
                return Err(ModelError::schema(
                    format!("{} forecast", domain),
                    format!(
                        "duplicate segment {:?} in year {}",
                        record.key, record.year
                    ),
                ));
            }
        }
    }

    Ok((order, joined))
}

fn check_domain(table: &ForecastTable, expected: Domain) -> Result<()> {
    if table.domain == expected {
        Ok(())
    } else {
        Err(ModelError::schema(
            format!("{} forecast", expected),
            format!("received a {} forecast", table.domain),
        ))
    }
}

fn first_of_january(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
        ModelError::schema("forecast", format!("year {} cannot form a date", year))
    })
}
