//! # Report Export
//!
//! Turns calculation summaries into CSV, JSON or plain-text reports. The
//! engines only produce [`SummaryTable`]s and serializable records; this
//! module owns every file format.
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::report::{to_csv, SummaryTable};
//!
//! let table = SummaryTable::new("Shaft Design")
//!     .with_row("Outer Diameter (mm)", "39.60")
//!     .with_row("Material", "AISI 1045 Steel");
//!
//! let csv = to_csv(&table).unwrap();
//! assert!(csv.starts_with("Parameter,Value\n"));
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialProperties;

/// Name recorded as the producing software in exported files
pub const SOFTWARE_NAME: &str = "ShaftGear Mechanical Design Tool";

/// Version of the JSON export layout
pub const EXPORT_VERSION: &str = "1.0";

const RULE_WIDTH: usize = 80;
const SECTION_RULE_WIDTH: usize = 40;

/// One parameter/value line of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub parameter: String,
    pub value: String,
}

/// Ordered parameter → value table produced by an engine
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryTable {
    pub title: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(title: impl Into<String>) -> Self {
        SummaryTable {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Builder-style append
    pub fn with_row(mut self, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(parameter, value);
        self
    }

    pub fn push(&mut self, parameter: impl Into<String>, value: impl Into<String>) {
        self.rows.push(SummaryRow {
            parameter: parameter.into(),
            value: value.into(),
        });
    }

    /// Value of the first row named `parameter`
    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.parameter == parameter)
            .map(|r| r.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Text];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExportFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Text),
            _ => Err(CalcError::UnknownFormat { format: s.to_string() }),
        }
    }
}

/// Render a summary as two-column CSV with a `Parameter,Value` header.
pub fn to_csv(table: &SummaryTable) -> CalcResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Parameter", "Value"])
        .map_err(CalcError::serialization)?;
    for row in &table.rows {
        writer
            .write_record([row.parameter.as_str(), row.value.as_str()])
            .map_err(CalcError::serialization)?;
    }
    let bytes = writer.into_inner().map_err(CalcError::serialization)?;
    String::from_utf8(bytes).map_err(CalcError::serialization)
}

#[derive(Serialize)]
struct JsonExport<'a, T: Serialize> {
    export_info: ExportInfo,
    parameters: &'a T,
    calculation_metadata: CalculationMetadata,
}

#[derive(Serialize)]
struct ExportInfo {
    timestamp: String,
    export_type: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct CalculationMetadata {
    units: &'static str,
    calculation_date: String,
    software: &'static str,
}

/// Wrap a parameter record in the JSON export envelope, stamped `now`.
pub fn to_json_at<T: Serialize>(parameters: &T, now: DateTime<Utc>) -> CalcResult<String> {
    let export = JsonExport {
        export_info: ExportInfo {
            timestamp: now.format("%Y%m%d_%H%M%S").to_string(),
            export_type: "mechanical_engineering_calculation",
            version: EXPORT_VERSION,
        },
        parameters,
        calculation_metadata: CalculationMetadata {
            units: "SI (metric)",
            calculation_date: now.to_rfc3339(),
            software: SOFTWARE_NAME,
        },
    };
    serde_json::to_string_pretty(&export).map_err(CalcError::serialization)
}

/// [`to_json_at`] stamped with the current time
pub fn to_json<T: Serialize>(parameters: &T) -> CalcResult<String> {
    to_json_at(parameters, Utc::now())
}

/// `<base>_<YYYYmmdd_HHMMSS>.<ext>`, with the base reduced to a single
/// lowercase path component.
pub fn default_file_name(base: &str, format: ExportFormat, timestamp: DateTime<Utc>) -> String {
    let stem: String = base
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    format!(
        "{}_{}.{}",
        stem,
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Everything the plain-text report prints
#[derive(Debug, Clone)]
pub struct TextReport<'a> {
    pub title: &'a str,
    pub results: &'a SummaryTable,
    pub safety: &'a SummaryTable,
    /// (name, properties) of each material involved
    pub materials: Vec<(&'a str, &'a MaterialProperties)>,
    pub warnings: Vec<String>,
}

impl TextReport<'_> {
    /// Render the report with a `generated` timestamp.
    pub fn render(&self, generated: DateTime<Utc>) -> String {
        let mut out: Vec<String> = Vec::new();
        let rule = "=".repeat(RULE_WIDTH);

        out.push(rule.clone());
        out.push(self.title.to_uppercase());
        out.push(rule.clone());
        out.push(format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S UTC")));
        out.push(format!("Software: {} {}", SOFTWARE_NAME, env!("CARGO_PKG_VERSION")));
        out.push(String::new());

        section(&mut out, "CALCULATION RESULTS");
        for row in &self.results.rows {
            out.push(format!("{}: {}", row.parameter, row.value));
        }
        out.push(String::new());

        for (name, props) in &self.materials {
            section(&mut out, &format!("MATERIAL PROPERTIES - {}", name));
            out.push(format!(
                "Yield Strength: {:.0} MPa ({} Pa)",
                props.yield_mpa(),
                format_engineering(props.yield_strength_pa, 1)
            ));
            out.push(format!(
                "Ultimate Strength: {:.0} MPa ({} Pa)",
                props.ultimate_mpa(),
                format_engineering(props.ultimate_strength_pa, 1)
            ));
            out.push(format!(
                "Elastic Modulus: {:.0} GPa ({} Pa)",
                props.elastic_modulus_gpa(),
                format_engineering(props.elastic_modulus_pa, 1)
            ));
            out.push(format!("Density: {:.0} kg/m³", props.density_kg_m3));
            out.push(String::new());
        }

        section(&mut out, "SAFETY ASSESSMENT");
        if self.safety.is_empty() {
            out.push("Safety factor analysis not available".to_string());
        }
        for row in &self.safety.rows {
            out.push(format!("{}: {}", row.parameter, row.value));
        }
        out.push(String::new());

        if !self.warnings.is_empty() {
            section(&mut out, "WARNINGS");
            for w in &self.warnings {
                out.push(format!("! {}", w));
            }
            out.push(String::new());
        }

        section(&mut out, "DESIGN RECOMMENDATIONS");
        for line in [
            "Verify all safety factors meet or exceed minimum requirements",
            "Consider manufacturing tolerances in final design",
            "Review material selection for operating environment",
            "Validate assumptions with detailed FEA if critical application",
            "Consider fatigue analysis for cyclic loading conditions",
        ] {
            out.push(format!("• {}", line));
        }
        out.push(String::new());

        section(&mut out, "DISCLAIMER");
        out.push("This analysis is based on simplified engineering calculations.".to_string());
        out.push("For critical applications, detailed finite element analysis".to_string());
        out.push("and professional engineering review are recommended.".to_string());
        out.push("Verify all results against applicable design codes and standards.".to_string());
        out.push(String::new());
        out.push(rule);

        out.join("\n")
    }
}

fn section(out: &mut Vec<String>, heading: &str) {
    out.push(heading.to_string());
    out.push("-".repeat(SECTION_RULE_WIDTH));
}

/// Render in the requested format. CSV carries the result table only; JSON
/// carries the serialized `parameters` record.
pub fn render<T: Serialize>(
    format: ExportFormat,
    report: &TextReport<'_>,
    parameters: &T,
    now: DateTime<Utc>,
) -> CalcResult<String> {
    match format {
        ExportFormat::Csv => to_csv(report.results),
        ExportFormat::Json => to_json_at(parameters, now),
        ExportFormat::Text => Ok(report.render(now)),
    }
}

/// Engineering notation: exponent a multiple of 3.
///
/// ```rust
/// use shaftgear_core::report::format_engineering;
///
/// assert_eq!(format_engineering(155e6, 2), "155.00e+6");
/// assert_eq!(format_engineering(0.0396, 1), "39.6e-3");
/// assert_eq!(format_engineering(12.5, 1), "12.5");
/// ```
pub fn format_engineering(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", precision, value);
    }
    let exponent = ((value.abs().log10() / 3.0).floor() * 3.0) as i32;
    let mantissa = value / 10f64.powi(exponent);
    if exponent == 0 {
        format!("{:.*}", precision, mantissa)
    } else {
        format!("{:.*}e{:+}", precision, mantissa, exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn sample_table() -> SummaryTable {
        SummaryTable::new("Shaft Design")
            .with_row("Outer Diameter (mm)", "39.60")
            .with_row("Material", "AISI 1045 Steel")
    }

    #[test]
    fn test_csv_output() {
        let csv = to_csv(&sample_table()).unwrap();
        assert_eq!(
            csv,
            "Parameter,Value\nOuter Diameter (mm),39.60\nMaterial,AISI 1045 Steel\n"
        );
    }

    #[test]
    fn test_csv_quotes_commas() {
        let table = SummaryTable::new("t").with_row("Loads", "1000, 500");
        let csv = to_csv(&table).unwrap();
        assert!(csv.contains("Loads,\"1000, 500\""));
    }

    #[test]
    fn test_json_envelope() {
        #[derive(Serialize)]
        struct Params {
            torque_nm: f64,
        }
        let json = to_json_at(&Params { torque_nm: 1000.0 }, fixed_time()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["export_info"]["timestamp"], "20250314_092653");
        assert_eq!(value["export_info"]["export_type"], "mechanical_engineering_calculation");
        assert_eq!(value["export_info"]["version"], "1.0");
        assert_eq!(value["parameters"]["torque_nm"], 1000.0);
        assert_eq!(value["calculation_metadata"]["units"], "SI (metric)");
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FORMAT");
    }

    #[test]
    fn test_default_file_name() {
        let name = default_file_name("Shaft Design Report", ExportFormat::Text, fixed_time());
        assert_eq!(name, "shaft_design_report_20250314_092653.txt");
    }

    #[test]
    fn test_default_file_name_strips_path_separators() {
        let name = default_file_name("26/042", ExportFormat::Json, fixed_time());
        assert_eq!(name, "26_042_20250314_092653.json");

        let name = default_file_name("../Job\\7: A", ExportFormat::Csv, fixed_time());
        assert!(!name.contains('/') && !name.contains('\\') && !name.contains(':'));
        assert_eq!(name, ".._job_7__a_20250314_092653.csv");
        assert_eq!(std::path::Path::new(&name).components().count(), 1);
    }

    #[test]
    fn test_text_report_sections() {
        let results = sample_table();
        let safety = SummaryTable::new("Safety").with_row("Safety Factor", "2.00 (target 2.0) OK");
        let steel = crate::materials::lookup("AISI 1045 Steel");
        let report = TextReport {
            title: "Shaft Design Report",
            results: &results,
            safety: &safety,
            materials: vec![(steel.name, steel.properties)],
            warnings: vec![],
        };
        let text = report.render(fixed_time());
        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("SHAFT DESIGN REPORT"));
        assert!(text.contains("Outer Diameter (mm): 39.60"));
        assert!(text.contains("Yield Strength: 310 MPa (310.0e+6 Pa)"));
        assert!(text.contains("Ultimate Strength: 565 MPa (565.0e+6 Pa)"));
        assert!(text.contains("Elastic Modulus: 200 GPa (200.0e+9 Pa)"));
        assert!(text.contains("Safety Factor: 2.00 (target 2.0) OK"));
        assert!(text.contains("DISCLAIMER"));
        assert!(!text.contains("WARNINGS"));
    }

    #[test]
    fn test_text_report_without_safety_rows() {
        let results = sample_table();
        let safety = SummaryTable::default();
        let report = TextReport {
            title: "Gear Design Report",
            results: &results,
            safety: &safety,
            materials: vec![],
            warnings: vec!["Unknown material".into()],
        };
        let text = report.render(fixed_time());
        assert!(text.contains("Safety factor analysis not available"));
        assert!(text.contains("! Unknown material"));
    }

    #[test]
    fn test_format_engineering() {
        assert_eq!(format_engineering(0.0, 2), "0.00");
        assert_eq!(format_engineering(-2500.0, 1), "-2.5e+3");
        assert_eq!(format_engineering(200e9, 0), "200e+9");
    }
}
