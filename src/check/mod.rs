//! Health evaluation of discovered items.
//!
//! Every registry attribute present in the current reading yields one
//! [`AttributeResult`], in registry order. Which comparison applies is fixed
//! per attribute by its [`EvaluationPolicy`]:
//!
//! | Policy | Reference | Critical when |
//! |--------|-----------|---------------|
//! | default | discovery value | value > reference |
//! | spare threshold | `Available_Spare_Threshold` of the current reading | value < threshold |
//! | normalized cross-check | discovery value | normalized value <= normalized threshold |
//! | rate limited | discovery value (shown only) | more than 100 counts per hour |
//!
//! Attributes without a reference are informational and always normal.

mod policy;

pub use policy::{Assessment, MAX_COMMAND_TIMEOUTS_PER_HOUR, MAX_COMMAND_TIMEOUT_RATE};

use smartwatch_sdk::{RateError, RateKey, RateTracker, CMD_TIMEOUT_COUNTER, DEFAULT_CHECK};
use smartwatch_types::{
    AttributeResult, Baseline, CheckOutcome, DiskAttribute, DiskReading, EvaluationPolicy, Metric,
    Section, AVAILABLE_SPARE_THRESHOLD,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Evaluation of an item could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The rate state produced no rate this cycle; the item is evaluated
    /// again on the next one.
    #[error("{item}: {source}")]
    Rate {
        item: String,
        #[source]
        source: RateError,
    },

    /// The requested item was never discovered.
    #[error("{item}: not among the discovered items")]
    UnknownItem { item: String },
}

impl CheckError {
    /// Item the error refers to.
    pub fn item(&self) -> &str {
        match self {
            CheckError::Rate { item, .. } | CheckError::UnknownItem { item } => item,
        }
    }
}

/// Evaluates items against their baselines.
pub struct Evaluator<'a, R: RateTracker + ?Sized> {
    rates: &'a R,
    now: f64,
    check: String,
}

impl<'a, R: RateTracker + ?Sized> Evaluator<'a, R> {
    /// Create an evaluator for one check cycle at wall-clock time `now`
    /// (seconds since the Unix epoch).
    pub fn new(rates: &'a R, now: f64) -> Self {
        Self {
            rates,
            now,
            check: DEFAULT_CHECK.to_string(),
        }
    }

    /// Logical check instance used in rate state keys.
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = check.into();
        self
    }

    /// Evaluate one item.
    ///
    /// An item whose device is missing from `section` yields an outcome
    /// without results.
    pub fn check_item(
        &self,
        item: &str,
        baseline: &Baseline,
        section: &Section,
    ) -> Result<CheckOutcome, CheckError> {
        let mut outcome = CheckOutcome::new(item);

        let Some(reading) = section.get(item) else {
            debug!(item, "device not present in current reading");
            return Ok(outcome);
        };

        for &attribute in DiskAttribute::ALL {
            let Some(value) = reading.value(attribute) else {
                continue;
            };
            let Some(assessment) = self.assess(item, attribute, value, reading, baseline)? else {
                continue;
            };

            let summary = assessment.summary(&attribute.label(), &attribute.render(value));
            if assessment.verdict.is_critical() {
                warn!(item, %attribute, %summary, "attribute critical");
            }

            outcome.results.push(AttributeResult {
                attribute,
                verdict: assessment.verdict,
                summary,
                metric: Metric::new(attribute.name(), value),
            });
        }

        Ok(outcome)
    }

    fn assess(
        &self,
        item: &str,
        attribute: DiskAttribute,
        value: i64,
        reading: &DiskReading,
        baseline: &Baseline,
    ) -> Result<Option<Assessment>, CheckError> {
        let policy = attribute.policy();

        let reference = match policy {
            EvaluationPolicy::Skipped => return Ok(None),
            EvaluationPolicy::SpareThreshold => reading.get(AVAILABLE_SPARE_THRESHOLD),
            _ => baseline.value(attribute),
        };
        let Some(reference) = reference else {
            return Ok(Some(Assessment::informational()));
        };

        let assessment = match policy {
            EvaluationPolicy::SpareThreshold => Assessment::below(value, reference),
            EvaluationPolicy::NormalizedCrossCheck => {
                let raw = Assessment::exceeds(value, reference);
                match reading.reallocated_events_normalized {
                    Some(normalized) => raw.cross_check(normalized),
                    None => raw,
                }
            }
            EvaluationPolicy::RateLimited => {
                let key = RateKey::new(&self.check, item, CMD_TIMEOUT_COUNTER).to_string();
                let rate = self
                    .rates
                    .get_rate(&key, self.now, value)
                    .map_err(|source| CheckError::Rate {
                        item: item.to_string(),
                        source,
                    })?;
                Assessment::rate_limited(rate, reference)
            }
            EvaluationPolicy::Default | EvaluationPolicy::Skipped => {
                Assessment::exceeds(value, reference)
            }
        };

        Ok(Some(assessment))
    }
}

/// Outcome of one item in a check cycle.
#[derive(Debug)]
pub enum ItemCheck {
    Evaluated(CheckOutcome),
    Pending(CheckError),
}

/// Evaluate every item of `baselines` (or only `only`, when given).
///
/// A rate that is not available yet does not stop the other items. An
/// `only` item missing from `baselines` is reported as pending.
pub fn check_all<'s, R: RateTracker + ?Sized>(
    evaluator: &Evaluator<'_, R>,
    baselines: impl IntoIterator<Item = (&'s String, &'s Baseline)>,
    section: &Section,
    only: Option<&str>,
) -> Vec<ItemCheck> {
    let checks: Vec<ItemCheck> = baselines
        .into_iter()
        .filter(|(item, _)| only.map_or(true, |only| only == item.as_str()))
        .map(
            |(item, baseline)| match evaluator.check_item(item, baseline, section) {
                Ok(outcome) => ItemCheck::Evaluated(outcome),
                Err(err) => {
                    info!(%err, "item pending");
                    ItemCheck::Pending(err)
                }
            },
        )
        .collect();

    match only {
        Some(item) if checks.is_empty() => {
            warn!(item, "requested item was never discovered");
            vec![ItemCheck::Pending(CheckError::UnknownItem {
                item: item.to_string(),
            })]
        }
        _ => checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartwatch_sdk::RateState;
    use smartwatch_types::{DiskReadingBuilder, Verdict};

    const SDA: &str = "/dev/sda";
    const NVME: &str = "/dev/nvme0n1";
    const HOUR: f64 = 3600.0;

    fn baseline(pairs: &[(DiskAttribute, i64)]) -> Baseline {
        pairs
            .iter()
            .map(|(a, v)| (a.name().to_string(), *v))
            .collect()
    }

    fn sda(f: impl FnOnce(DiskReadingBuilder) -> DiskReadingBuilder) -> Section {
        Section::builder().disk(SDA, f).build()
    }

    #[test]
    fn test_no_baseline_is_informational() {
        let rates = RateState::new();
        let section = sda(|d| {
            d.attribute(DiskAttribute::ReallocatedSectors, 12)
                .attribute(DiskAttribute::PowerOnHours, 1408)
                .attribute(DiskAttribute::CommandTimeoutCounter, 99)
        });

        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(SDA, &Baseline::new(), &section)
            .unwrap();

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.verdict(), Verdict::Normal);
        assert_eq!(
            outcome.get(DiskAttribute::ReallocatedSectors).unwrap().metric,
            Metric::new("Reallocated_Sectors", 12)
        );
        assert_eq!(
            outcome.get(DiskAttribute::PowerOnHours).unwrap().summary,
            "Powered on: 58 days 16 hours"
        );
        // The rate state is not touched without a baseline
        assert!(rates.is_empty());
    }

    #[test]
    fn test_default_comparison() {
        let rates = RateState::new();
        let evaluator = Evaluator::new(&rates, 0.0);
        let base = baseline(&[(DiskAttribute::ReallocatedSectors, 0)]);

        let ok = evaluator
            .check_item(SDA, &base, &sda(|d| d.attribute(DiskAttribute::ReallocatedSectors, 0)))
            .unwrap();
        assert_eq!(ok.verdict(), Verdict::Normal);
        assert_eq!(ok.results[0].summary, "Reallocated sectors: 0");

        let crit = evaluator
            .check_item(SDA, &base, &sda(|d| d.attribute(DiskAttribute::ReallocatedSectors, 3)))
            .unwrap();
        assert_eq!(crit.verdict(), Verdict::Critical);
        assert_eq!(
            crit.results[0].summary,
            "Reallocated sectors: 3 (during discovery: 0 (!!))"
        );
        assert_eq!(crit.results[0].metric.value, 3);
    }

    #[test]
    fn test_available_spare_uses_current_threshold() {
        let rates = RateState::new();
        let evaluator = Evaluator::new(&rates, 0.0);
        let reading = |spare| {
            Section::builder()
                .disk(NVME, |d| {
                    d.attribute(DiskAttribute::AvailableSpare, spare)
                        .raw(AVAILABLE_SPARE_THRESHOLD, 10)
                })
                .build()
        };

        let ok = evaluator
            .check_item(NVME, &Baseline::new(), &reading(10))
            .unwrap();
        assert_eq!(ok.verdict(), Verdict::Normal);
        assert_eq!(ok.results[0].summary, "Available spare: 10.00%");

        let crit = evaluator
            .check_item(NVME, &Baseline::new(), &reading(9))
            .unwrap();
        assert_eq!(crit.verdict(), Verdict::Critical);
        assert_eq!(
            crit.results[0].summary,
            "Available spare: 9.00% (during discovery: 10 (!!))"
        );
    }

    #[test]
    fn test_available_spare_ignores_discovery_value() {
        let rates = RateState::new();
        let section = Section::builder()
            .disk(NVME, |d| {
                d.attribute(DiskAttribute::AvailableSpare, 20)
                    .raw(AVAILABLE_SPARE_THRESHOLD, 10)
            })
            .build();

        // Far below the discovered 50%, still above the current threshold
        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(NVME, &baseline(&[(DiskAttribute::AvailableSpare, 50)]), &section)
            .unwrap();
        assert_eq!(outcome.verdict(), Verdict::Normal);
        assert_eq!(outcome.results[0].summary, "Available spare: 20.00%");
    }

    #[test]
    fn test_available_spare_without_threshold_is_informational() {
        let rates = RateState::new();
        let section = Section::builder()
            .disk(NVME, |d| d.attribute(DiskAttribute::AvailableSpare, 0))
            .build();

        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(NVME, &Baseline::new(), &section)
            .unwrap();
        assert_eq!(outcome.verdict(), Verdict::Normal);
    }

    #[test]
    fn test_reallocated_events_cross_check() {
        let rates = RateState::new();
        let evaluator = Evaluator::new(&rates, 0.0);
        let base = baseline(&[(DiskAttribute::ReallocatedEvents, 0)]);

        // Raw value grew but the normalized value is healthy
        let section = sda(|d| {
            d.attribute(DiskAttribute::ReallocatedEvents, 2)
                .reallocated_events_normalized(100, 36)
        });
        let outcome = evaluator.check_item(SDA, &base, &section).unwrap();
        assert_eq!(outcome.verdict(), Verdict::Normal);
        assert_eq!(
            outcome.results[0].summary,
            "Reallocated events: 2 (during discovery: 0 (!!), normalized value: 100)"
        );

        // Normalized value reached its threshold
        let section = sda(|d| {
            d.attribute(DiskAttribute::ReallocatedEvents, 0)
                .reallocated_events_normalized(36, 36)
        });
        let outcome = evaluator.check_item(SDA, &base, &section).unwrap();
        assert_eq!(outcome.verdict(), Verdict::Critical);
        assert_eq!(
            outcome.results[0].summary,
            "Reallocated events: 0 (normalized value: 36 (!!))"
        );
    }

    #[test]
    fn test_reallocated_events_without_pair_falls_back() {
        let rates = RateState::new();
        let base = baseline(&[(DiskAttribute::ReallocatedEvents, 0)]);
        let section = sda(|d| d.attribute(DiskAttribute::ReallocatedEvents, 2));

        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(SDA, &base, &section)
            .unwrap();
        assert_eq!(outcome.verdict(), Verdict::Critical);
    }

    #[test]
    fn test_command_timeouts_are_rate_limited() {
        let rates = RateState::new();
        let base = baseline(&[(DiskAttribute::CommandTimeoutCounter, 0)]);
        let reading = |v| sda(|d| d.attribute(DiskAttribute::CommandTimeoutCounter, v));

        let first = Evaluator::new(&rates, 0.0).check_item(SDA, &base, &reading(0));
        assert!(matches!(
            first,
            Err(CheckError::Rate {
                source: RateError::Initialized(_),
                ..
            })
        ));
        assert!(rates.get("smart_stats./dev/sda.cmd_timeout").is_some());

        let slow = Evaluator::new(&rates, HOUR)
            .check_item(SDA, &base, &reading(50))
            .unwrap();
        assert_eq!(slow.verdict(), Verdict::Normal);
        assert_eq!(slow.results[0].summary, "Command timeout counter: 50");

        let fast = Evaluator::new(&rates, 2.0 * HOUR)
            .check_item(SDA, &base, &reading(100_050))
            .unwrap();
        assert_eq!(fast.verdict(), Verdict::Critical);
        assert_eq!(
            fast.results[0].summary,
            "Command timeout counter: 100050 (counter increased more than 100 counts / h (!!). \
             Value during discovery was: 0)"
        );
    }

    #[test]
    fn test_rate_key_uses_check_instance() {
        let rates = RateState::new();
        let base = baseline(&[(DiskAttribute::CommandTimeoutCounter, 0)]);
        let section = sda(|d| d.attribute(DiskAttribute::CommandTimeoutCounter, 0));

        let _ = Evaluator::new(&rates, 0.0)
            .with_check("smart_stats_ssd")
            .check_item(SDA, &base, &section);
        assert!(rates.get("smart_stats_ssd./dev/sda.cmd_timeout").is_some());
    }

    #[test]
    fn test_temperature_is_skipped() {
        let rates = RateState::new();
        let section = sda(|d| {
            d.attribute(DiskAttribute::Temperature, 99)
                .attribute(DiskAttribute::PowerCycles, 1)
        });

        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(SDA, &baseline(&[(DiskAttribute::Temperature, 20)]), &section)
            .unwrap();
        assert!(outcome.get(DiskAttribute::Temperature).is_none());
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_results_follow_registry_order() {
        let rates = RateState::new();
        let section = sda(|d| {
            d.attribute(DiskAttribute::DataUnitsWritten, 1)
                .attribute(DiskAttribute::ReallocatedSectors, 0)
                .attribute(DiskAttribute::CrcErrors, 0)
                .raw("Some_Vendor_Field", 5)
        });

        let outcome = Evaluator::new(&rates, 0.0)
            .check_item(SDA, &Baseline::new(), &section)
            .unwrap();
        let order: Vec<DiskAttribute> = outcome.results.iter().map(|r| r.attribute).collect();
        assert_eq!(
            order,
            vec![
                DiskAttribute::ReallocatedSectors,
                DiskAttribute::CrcErrors,
                DiskAttribute::DataUnitsWritten,
            ]
        );
    }

    #[test]
    fn test_vanished_item_has_no_results() {
        let rates = RateState::new();
        let outcome = Evaluator::new(&rates, 0.0)
            .check_item("/dev/sdz", &Baseline::new(), &Section::new())
            .unwrap();
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_check_all_continues_past_pending_items() {
        let rates = RateState::new();
        let section = Section::builder()
            .disk("/dev/sda", |d| d.attribute(DiskAttribute::CommandTimeoutCounter, 0))
            .disk("/dev/sdb", |d| d.attribute(DiskAttribute::ReallocatedSectors, 1))
            .build();
        let baselines = [
            (
                "/dev/sda".to_string(),
                baseline(&[(DiskAttribute::CommandTimeoutCounter, 0)]),
            ),
            (
                "/dev/sdb".to_string(),
                baseline(&[(DiskAttribute::ReallocatedSectors, 0)]),
            ),
        ];
        let evaluator = Evaluator::new(&rates, 0.0);

        let checks = check_all(&evaluator, baselines.iter().map(|(i, b)| (i, b)), &section, None);
        assert_eq!(checks.len(), 2);
        assert!(matches!(checks[0], ItemCheck::Pending(_)));
        assert!(
            matches!(&checks[1], ItemCheck::Evaluated(o) if o.verdict() == Verdict::Critical)
        );

        let only = check_all(
            &evaluator,
            baselines.iter().map(|(i, b)| (i, b)),
            &section,
            Some("/dev/sdb"),
        );
        assert_eq!(only.len(), 1);
    }

    #[test]
    fn test_check_all_reports_unknown_item() {
        let rates = RateState::new();
        let baselines = [(
            SDA.to_string(),
            baseline(&[(DiskAttribute::ReallocatedSectors, 0)]),
        )];
        let section = sda(|d| d.attribute(DiskAttribute::ReallocatedSectors, 0));
        let evaluator = Evaluator::new(&rates, 0.0);

        let checks = check_all(
            &evaluator,
            baselines.iter().map(|(i, b)| (i, b)),
            &section,
            Some("/dev/sdx"),
        );
        assert_eq!(checks.len(), 1);
        match &checks[0] {
            ItemCheck::Pending(err) => {
                assert_eq!(
                    err,
                    &CheckError::UnknownItem {
                        item: "/dev/sdx".to_string()
                    }
                );
                assert_eq!(err.item(), "/dev/sdx");
            }
            other => panic!("expected pending item, got {other:?}"),
        }
    }

    #[test]
    fn test_works_through_dyn_tracker() {
        let state = RateState::new();
        let rates: &dyn RateTracker = &state;
        let section = sda(|d| d.attribute(DiskAttribute::PowerCycles, 1));

        let outcome = Evaluator::new(rates, 0.0)
            .check_item(SDA, &Baseline::new(), &section)
            .unwrap();
        assert_eq!(outcome.results.len(), 1);
    }
}
