/*!

This is the long-form manual for `supply_insight` and `pdswatch`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values with a header row
* `xlsx` Excel workbooks (one worksheet per dataset)

### `csv`

The first record names the columns; every following record is a data row.
Cells are read as text and coerced to numbers only when a column is used as
a measure: thousands separators are stripped, and blank or `NaN`-like cells
are treated as missing rather than as errors.

### `xlsx`

The first row of the worksheet names the columns. When the workbook holds a
single worksheet it is used directly; otherwise the worksheet name must be
provided (`excelWorksheetName` in the configuration, or
`--excel-worksheet-name` on the command line).

## Configuration

A report is described by a JSON file:

```json
{
  "reportSettings": {
    "reportName": "Monthly PDS review",
    "topGroups": 5,
    "anomalyThreshold": "2.0"
  },
  "datasets": [
    {
      "name": "fps_counts",
      "filePath": "fps_counts.csv",
      "dimensionColumn": "District",
      "measureColumn": "FPS Count"
    },
    {
      "name": "ration_cards",
      "filePath": "cards.xlsx",
      "format": "xlsx",
      "excelWorksheetName": "2024",
      "dimensionColumn": "District",
      "measureColumn": "Cards"
    }
  ]
}
```

File paths are resolved relative to the directory holding the configuration
file. `topGroups` and `anomalyThreshold` accept either a JSON number or a
string holding one.

A dataset whose file is missing or unreadable renders as an `unavailable`
block with a notice; the rest of the report is unaffected. A dataset whose
measure column holds no numeric values renders as a `noData` block.

Optional sections:

* `scorecard` supplies the gauge positions for the simulated health indices
  (`routeDeviationPct`, `ghostBeneficiaryPct`, `grainQuality`,
  `fpsUptimePct`, `unusualDbtTransactions`), plus parameter overrides such
  as `leakageMultiplier` and `ghostCleanupRate`.
* `responses` prepends custom keyword rules to the built-in canned-response
  list used by `--ask`.

## Quick mode

A single file can be aggregated without a configuration file:

```bash
pdswatch -i fps_counts.csv --dimension District --measure "FPS Count"
```

## Checking against a reference

`--reference <file>` compares the computed summary against a previously
saved one and prints a line diff when they differ.

*/
