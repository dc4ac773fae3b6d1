// ============================================================================
// Calculation Engine
// Runs the accumulation suite and hands each result to a result sink
// ============================================================================

use crate::accumulators::{create_accumulator, standard_suite, SuiteEntry};
use crate::domain::{
    CalculationRecord, NewCalculationRecord, RecordLayout, COMBINED_RECORD_NAME,
};
use crate::interfaces::{AccumulationOutcome, ResultSink};
use crate::Result;
use std::io::Write;

/// One finished accumulation
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub entry: SuiteEntry,
    pub name: String,
    pub outcome: AccumulationOutcome,
}

/// What a run produced and stored
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub results: Vec<CalculationResult>,
    pub stored: Vec<CalculationRecord>,
}

/// Sequential calculation runner.
///
/// Accumulators never see the sink; only [`run`](Self::run) threads it
/// through, so the numeric code stays pure.
pub struct CalculationEngine {
    entries: Vec<SuiteEntry>,
    layout: RecordLayout,
}

impl CalculationEngine {
    pub fn new(entries: Vec<SuiteEntry>, layout: RecordLayout) -> Self {
        Self { entries, layout }
    }

    /// Engine over the five standard calculations
    pub fn standard(layout: RecordLayout) -> Self {
        Self::new(standard_suite(), layout)
    }

    /// Run every accumulator without touching a sink
    pub fn compute(&self) -> Result<Vec<CalculationResult>> {
        self.entries
            .iter()
            .map(|entry| -> Result<CalculationResult> {
                let accumulator = create_accumulator(entry.kind);
                let outcome = accumulator.accumulate()?;
                Ok(CalculationResult {
                    entry: *entry,
                    name: accumulator.name().to_string(),
                    outcome,
                })
            })
            .collect()
    }

    /// Group results into records according to the layout
    pub fn records(&self, results: &[CalculationResult]) -> Result<Vec<NewCalculationRecord>> {
        match self.layout {
            RecordLayout::Combined => {
                let mut record = NewCalculationRecord::named(COMBINED_RECORD_NAME);
                for result in results {
                    record.fill(result.entry.slot, &result.outcome)?;
                }
                Ok(vec![record])
            },
            RecordLayout::PerStrategy => results
                .iter()
                .map(|result| -> Result<NewCalculationRecord> {
                    let mut record = NewCalculationRecord::named(result.entry.slot.label());
                    record.fill(result.entry.slot, &result.outcome)?;
                    Ok(record)
                })
                .collect(),
        }
    }

    /// Run the suite in order, print each entry's header and outcome to
    /// `out`, and insert the records. Stops at the first error.
    pub fn run<W: Write>(&self, sink: &mut dyn ResultSink, out: &mut W) -> Result<RunSummary> {
        let mut results = Vec::with_capacity(self.entries.len());
        let mut stored = Vec::new();

        for entry in &self.entries {
            let accumulator = create_accumulator(entry.kind);
            let outcome = accumulator.accumulate()?;

            if let Some(header) = entry.header {
                writeln!(out, "{header}")?;
            }
            if entry.detailed {
                writeln!(out, "{outcome:#}")?;
            } else {
                writeln!(out, "{outcome}")?;
            }
            tracing::info!(
                strategy = accumulator.name(),
                verdict = ?outcome.verdict(),
                "calculation finished"
            );

            let result = CalculationResult {
                entry: *entry,
                name: accumulator.name().to_string(),
                outcome,
            };

            if self.layout == RecordLayout::PerStrategy {
                for record in self.records(std::slice::from_ref(&result))? {
                    stored.push(self.store(sink, &record)?);
                }
            }
            results.push(result);
        }

        if self.layout == RecordLayout::Combined {
            for record in self.records(&results)? {
                stored.push(self.store(sink, &record)?);
            }
        }

        Ok(RunSummary { results, stored })
    }

    fn store(
        &self,
        sink: &mut dyn ResultSink,
        record: &NewCalculationRecord,
    ) -> Result<CalculationRecord> {
        let stored = sink.insert(record)?;
        tracing::info!(
            backend = sink.backend(),
            id = stored.id,
            name = %stored.data.name,
            "calculation record stored"
        );
        Ok(stored)
    }
}

/// Read back every stored record and print one line per record
pub fn report_all<W: Write>(
    sink: &mut dyn ResultSink,
    out: &mut W,
) -> Result<Vec<CalculationRecord>> {
    let records = sink.list_all()?;
    for record in &records {
        writeln!(out, "{record}")?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordSlot;
    use crate::interfaces::{MemorySink, SinkError, SinkResult};

    fn ready_sink() -> MemorySink {
        let mut sink = MemorySink::default();
        sink.ensure_schema().unwrap();
        sink
    }

    #[test]
    fn test_combined_run_stores_one_record() {
        let engine = CalculationEngine::standard(RecordLayout::Combined);
        let mut sink = ready_sink();
        let mut out = Vec::new();

        let summary = engine.run(&mut sink, &mut out).unwrap();

        assert_eq!(summary.results.len(), 5);
        assert_eq!(summary.stored.len(), 1);
        let record = &summary.stored[0].data;
        assert_eq!(record.name, COMBINED_RECORD_NAME);
        assert_eq!(record.int_error_value, 99_999_984);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("i = 99999984"));
        assert!(printed.contains("Correct! The result is exactly 1."));
        assert!(printed.contains("Error! The result is not exactly 1 due to rounding."));
    }

    #[test]
    fn test_standard_run_output() {
        let engine = CalculationEngine::standard(RecordLayout::Combined);
        let mut out = Vec::new();
        engine.run(&mut ready_sink(), &mut out).unwrap();

        let expected = "\
0.9999999999999999
10000
1
--Error case with 1.0/49.0 --
i = 99999984
Expected: 1.0, Actual: 0.99999983999999997319
--- big.Rat case with 1/49 ---
Correct! The result is exactly 1.
Result as a fraction: 1/1
Result as float64: 1.00000000000000000000

--- decimal.Decimal case with 1/49 ---
Error! The result is not exactly 1 due to rounding.
Final Sum:  0.99999999999999999999999999999999999999999999999984
Difference: 0.00000000000000000000000000000000000000000000000016
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_output_is_the_same_for_both_layouts() {
        let mut combined = Vec::new();
        let mut per_strategy = Vec::new();
        CalculationEngine::standard(RecordLayout::Combined)
            .run(&mut ready_sink(), &mut combined)
            .unwrap();
        CalculationEngine::standard(RecordLayout::PerStrategy)
            .run(&mut ready_sink(), &mut per_strategy)
            .unwrap();
        assert_eq!(combined, per_strategy);
    }

    #[test]
    fn test_per_strategy_run_stores_five_records() {
        let engine = CalculationEngine::standard(RecordLayout::PerStrategy);
        let mut sink = ready_sink();

        let summary = engine.run(&mut sink, &mut std::io::sink()).unwrap();

        let names: Vec<&str> = summary.stored.iter().map(|r| r.data.name.as_str()).collect();
        let labels: Vec<&str> = RecordSlot::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(names, labels);

        // only the strategy's own field is populated
        let float_row = &summary.stored[0].data;
        assert_eq!(float_row.float_value, 0.9999999999999999);
        assert_eq!(float_row.int_value, 0);
        assert!(float_row.decimal_value.is_zero());
    }

    #[test]
    fn test_compute_is_independent_of_sink() {
        let engine = CalculationEngine::standard(RecordLayout::Combined);
        let results = engine.compute().unwrap();
        let records = engine.records(&results).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rational_value, 1.0);
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn ensure_schema(&mut self) -> SinkResult<()> {
            Ok(())
        }

        fn insert(&mut self, _record: &NewCalculationRecord) -> SinkResult<CalculationRecord> {
            Err(SinkError::Insert("disk full".to_string()))
        }

        fn list_all(&mut self) -> SinkResult<Vec<CalculationRecord>> {
            Ok(Vec::new())
        }

        fn backend(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_insert_failure_aborts_run() {
        let engine = CalculationEngine::standard(RecordLayout::PerStrategy);
        let result = engine.run(&mut FailingSink, &mut std::io::sink());
        assert!(matches!(
            result,
            Err(crate::Error::Sink(SinkError::Insert(_)))
        ));
    }

    #[test]
    fn test_report_all_prints_each_record() {
        let engine = CalculationEngine::standard(RecordLayout::PerStrategy);
        let mut sink = ready_sink();
        engine.run(&mut sink, &mut std::io::sink()).unwrap();

        let mut out = Vec::new();
        let records = report_all(&mut sink, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(printed.lines().count(), 5);
        assert!(printed.lines().all(|l| l.starts_with("ID: ")));
    }
}
