use clap::Parser;

/// This is an aggregation and anomaly reporting program for
/// civil-supplies monitoring data.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the report: datasets,
    /// dimension/measure columns, thresholds and optional scorecard inputs.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, pdswatch will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the report will be
    /// written in JSON format to the given location. Setting this option overrides the
    /// path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A single tabular file to aggregate without a
    /// configuration file. Requires --dimension and --measure.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. Overrides the type inferred
    /// from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The categorical column used to group rows when using --input.
    #[clap(long, value_parser)]
    pub dimension: Option<String>,

    /// The numeric column summed per group when using --input.
    #[clap(long, value_parser)]
    pub measure: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// Free-text question answered with a canned response and nothing else.
    #[clap(long, value_parser)]
    pub ask: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
