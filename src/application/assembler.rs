// Coverage assembler - groups aligned series by location into coverages
use crate::domain::coverage::{Coverage, CoverageResult, ParameterInfo, SeriesData};
use crate::domain::error::QueryError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageAssembler {
    /// Leave out ranges where every value is missing.
    pub drop_missing_ranges: bool,
}

impl CoverageAssembler {
    pub fn new(drop_missing_ranges: bool) -> Self {
        Self {
            drop_missing_ranges,
        }
    }

    pub fn assemble(&self, mut series: Vec<SeriesData>) -> Result<CoverageResult, QueryError> {
        // Grouping below only merges neighbours, so equal locations must be adjacent
        series.sort_by(|a, b| {
            a.location
                .lat
                .total_cmp(&b.location.lat)
                .then_with(|| a.location.lon.total_cmp(&b.location.lon))
                .then_with(|| a.parameter_id.cmp(&b.parameter_id))
        });

        let mut coverages: Vec<Coverage> = series
            .chunk_by(|a, b| a.location.key() == b.location.key())
            .map(|group| self.build_coverage(group))
            .collect::<Result<_, _>>()?;

        tracing::debug!(
            "Assembled {} coverages from {} series",
            coverages.len(),
            series.len()
        );

        if coverages.len() == 1 {
            Ok(CoverageResult::Single(coverages.remove(0)))
        } else {
            Ok(CoverageResult::Collection(coverages))
        }
    }

    fn build_coverage(&self, group: &[SeriesData]) -> Result<Coverage, QueryError> {
        let first = &group[0];
        let mut coverage = Coverage::new(first.location, first.times.clone());
        let mut seen = BTreeSet::new();

        for member in group {
            if member.times != coverage.times {
                return Err(QueryError::InconsistentTimeAxis {
                    lat: member.location.lat,
                    lon: member.location.lon,
                    parameter: member.parameter_id.clone(),
                });
            }
            if !seen.insert(member.parameter_id.as_str()) {
                return Err(QueryError::DuplicateParameter {
                    lat: member.location.lat,
                    lon: member.location.lon,
                    parameter: member.parameter_id.clone(),
                });
            }
            if self.drop_missing_ranges
                && !member.values.is_empty()
                && member.values.iter().all(Option::is_none)
            {
                continue;
            }

            coverage.parameters.insert(
                member.parameter_id.clone(),
                ParameterInfo {
                    unit: member.unit.clone(),
                },
            );
            coverage
                .ranges
                .insert(member.parameter_id.clone(), member.values.clone());
        }

        Ok(coverage)
    }
}
