//! # ShaftGear CLI
//!
//! Command-line front end for the shaft and gear design engines.
//!
//! ```text
//! shaftgear shaft --torque 1000 --moment 500 --length 500 --material "AISI 1045 Steel"
//! shaftgear gear --pinion-teeth 20 --gear-teeth 40 --module 3 --face-width 50 --power 10 --rpm 1500
//! shaftgear --format json project gearbox.sgp
//! ```
//!
//! Exit status is 0 when every check passes, 2 when a calculation ran but
//! missed a target, and 1 on error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use shaftgear_core::calculations::{CalculationItem, CalculationOutcome, GearPairInput, GearType, ShaftInput};
use shaftgear_core::file_io::{self, PROJECT_EXTENSION};
use shaftgear_core::materials::{self, MaterialCategory};
use shaftgear_core::report::{self, ExportFormat, SummaryTable, TextReport};
use shaftgear_core::settings::DesignSettings;
use shaftgear_core::units;
use shaftgear_core::{CalcError, CalcResult};

#[derive(Parser)]
#[command(name = "shaftgear", version, about = "Shaft and gear design calculations")]
struct Cli {
    /// Output format: text, json or csv
    #[arg(long, global = true, default_value = "text")]
    format: ExportFormat,

    /// JSON file with design settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write output to this file (or into this directory with a timestamped name)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the material catalog
    Materials {
        /// Only show one category (e.g. "Alloy Steel")
        #[arg(long)]
        category: Option<String>,
    },
    /// Size a shaft, or verify one when --outer is given
    Shaft(ShaftArgs),
    /// Rate a spur or helical gear pair
    Gear(GearArgs),
    /// Convert a value between units
    Convert { value: f64, from: String, to: String },
    /// Evaluate every calculation in a project file
    Project { file: PathBuf },
}

#[derive(Args, Clone)]
struct ShaftArgs {
    #[arg(long, default_value = "Shaft")]
    label: String,
    /// Torque (N·m)
    #[arg(long, default_value_t = 1000.0)]
    torque: f64,
    /// Bending moment (N·m)
    #[arg(long, default_value_t = 500.0)]
    moment: f64,
    /// Axial force (N)
    #[arg(long, default_value_t = 0.0)]
    axial: f64,
    /// Span between bearings (mm)
    #[arg(long, default_value_t = 1000.0)]
    length: f64,
    /// Outer diameter to verify (mm); omit to solve for it
    #[arg(long)]
    outer: Option<f64>,
    /// Bore diameter (mm); 0 for a solid shaft
    #[arg(long, default_value_t = 0.0)]
    inner: f64,
    /// Catalog material; blank uses the configured default
    #[arg(long, default_value = "")]
    material: String,
    #[arg(long = "safety-factor", default_value_t = 2.0)]
    safety_factor: f64,
}

impl ShaftArgs {
    fn into_input(self) -> ShaftInput {
        ShaftInput {
            label: self.label,
            torque_nm: self.torque,
            bending_moment_nm: self.moment,
            axial_force_n: self.axial,
            length_mm: self.length,
            outer_diameter_mm: self.outer,
            inner_diameter_mm: self.inner,
            material: self.material,
            target_safety_factor: self.safety_factor,
        }
    }
}

#[derive(Args, Clone)]
struct GearArgs {
    #[arg(long, default_value = "Gear pair")]
    label: String,
    /// spur or helical
    #[arg(long = "type", default_value = "spur", value_parser = GearType::from_str_flexible)]
    gear_type: GearType,
    #[arg(long)]
    pinion_teeth: u32,
    #[arg(long)]
    gear_teeth: u32,
    /// Module (mm)
    #[arg(long)]
    module: f64,
    /// Face width (mm)
    #[arg(long)]
    face_width: f64,
    /// Power (kW)
    #[arg(long)]
    power: f64,
    /// Pinion speed (rpm)
    #[arg(long)]
    rpm: f64,
    /// Helix angle (degrees), helical gears only
    #[arg(long, default_value_t = 0.0)]
    helix: f64,
    #[arg(long, default_value = "")]
    pinion_material: String,
    #[arg(long, default_value = "")]
    gear_material: String,
    #[arg(long, default_value_t = 2.0)]
    sf_bending: f64,
    #[arg(long, default_value_t = 1.5)]
    sf_contact: f64,
    /// Overload factor Ko
    #[arg(long, default_value_t = 1.25)]
    service_factor: f64,
    #[arg(long, default_value_t = 9)]
    quality: u8,
}

impl GearArgs {
    fn into_input(self) -> GearPairInput {
        if self.gear_type == GearType::Spur && self.helix != 0.0 {
            tracing::warn!(helix = self.helix, "helix angle ignored for spur gears");
        }
        GearPairInput {
            label: self.label,
            gear_type: self.gear_type,
            pinion_teeth: self.pinion_teeth,
            gear_teeth: self.gear_teeth,
            module_mm: self.module,
            helix_angle_deg: self.helix,
            face_width_mm: self.face_width,
            power_kw: self.power,
            pinion_rpm: self.rpm,
            pinion_material: self.pinion_material,
            gear_material: self.gear_material,
            safety_factor_bending: self.sf_bending,
            safety_factor_contact: self.sf_contact,
            service_factor: self.service_factor,
            quality_grade: self.quality,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            if cli.format == ExportFormat::Json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Output text plus whether every check passed
struct Rendered {
    base_name: String,
    body: String,
    passes: bool,
}

fn run(cli: &Cli) -> CalcResult<bool> {
    let settings = match &cli.config {
        Some(path) => DesignSettings::load(path)?,
        None => DesignSettings::default(),
    };
    let now = Utc::now();

    let rendered = match &cli.command {
        Command::Materials { category } => list_materials(category.as_deref(), cli.format)?,
        Command::Shaft(args) => {
            let item = CalculationItem::Shaft(args.clone().into_input());
            single_item(&item, &settings, cli.format, now)?
        }
        Command::Gear(args) => {
            let item = CalculationItem::GearPair(args.clone().into_input());
            single_item(&item, &settings, cli.format, now)?
        }
        Command::Convert { value, from, to } => convert(*value, from, to, cli.format)?,
        Command::Project { file } => {
            evaluate_project(file, cli.config.as_ref().map(|_| &settings), cli.format, now)?
        }
    };

    match &cli.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(report::default_file_name(&rendered.base_name, cli.format, now))
            } else {
                path.clone()
            };
            file_io::write_atomic(&path, rendered.body.as_bytes())?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered.body),
    }
    Ok(rendered.passes)
}

fn report_title(item: &CalculationItem) -> &'static str {
    match item {
        CalculationItem::Shaft(_) => "Shaft Design Analysis Report",
        CalculationItem::GearPair(_) => "Gear Design Analysis Report",
    }
}

fn text_report<'a>(title: &'a str, outcome: &'a CalculationOutcome) -> TextReport<'a> {
    TextReport {
        title,
        results: &outcome.summary,
        safety: &outcome.safety,
        materials: outcome
            .material_names()
            .into_iter()
            .map(|name| (name, materials::lookup(name).properties))
            .collect(),
        warnings: outcome.warning_lines(),
    }
}

fn single_item(
    item: &CalculationItem,
    settings: &DesignSettings,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> CalcResult<Rendered> {
    let outcome = item.evaluate(settings)?;
    for w in &outcome.warnings {
        tracing::debug!(warning = %w, "design warning");
    }
    let params = json!({ "input": item, "outcome": &outcome });
    let body = report::render(format, &text_report(report_title(item), &outcome), &params, now)?;
    Ok(Rendered {
        base_name: item.calc_type().to_string(),
        body,
        passes: outcome.passes,
    })
}

fn list_materials(category: Option<&str>, format: ExportFormat) -> CalcResult<Rendered> {
    let names = match category {
        Some(c) => materials::filter_by_category(MaterialCategory::from_str_flexible(c)?),
        None => materials::list_all(),
    };

    let mut table = SummaryTable::new("Material Catalog");
    let mut records = serde_json::Map::new();
    for name in names {
        let props = materials::try_lookup(name)?;
        table.push(
            name,
            format!(
                "{} | Sy {:.0} MPa | Su {:.0} MPa | E {:.0} GPa | {:.0} kg/m³",
                props.category,
                props.yield_mpa(),
                props.ultimate_mpa(),
                props.elastic_modulus_gpa(),
                props.density_kg_m3
            ),
        );
        records.insert(name.to_string(), serde_json::to_value(props).map_err(CalcError::serialization)?);
    }

    let body = match format {
        ExportFormat::Csv => report::to_csv(&table)?,
        ExportFormat::Json => report::to_json(&records)?,
        ExportFormat::Text => plain_table(&table),
    };
    Ok(Rendered {
        base_name: "materials".to_string(),
        body,
        passes: true,
    })
}

fn convert(value: f64, from: &str, to: &str, format: ExportFormat) -> CalcResult<Rendered> {
    let result = units::convert_str(value, from, to)?;
    let table = SummaryTable::new("Unit Conversion")
        .with_row("Value", format!("{} {}", value, from))
        .with_row("Result", format!("{} {}", result, to));

    let body = match format {
        ExportFormat::Csv => report::to_csv(&table)?,
        ExportFormat::Json => serde_json::to_string_pretty(&json!({
            "value": value, "from": from, "to": to, "result": result
        }))
        .map_err(CalcError::serialization)?,
        ExportFormat::Text => format!("{} {} = {} {}", value, from, result, to),
    };
    Ok(Rendered {
        base_name: "conversion".to_string(),
        body,
        passes: true,
    })
}

/// `settings_override` replaces the project's own settings when given.
fn evaluate_project(
    path: &Path,
    settings_override: Option<&DesignSettings>,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> CalcResult<Rendered> {
    if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
        tracing::warn!(path = %path.display(), "project file does not have the .{} extension", PROJECT_EXTENSION);
    }
    let (mut project, lock) = file_io::load_project_with_lock_check(path)?;
    if let Some(lock) = lock {
        tracing::warn!(user = %lock.user_id, machine = %lock.machine, "project is open elsewhere; reading anyway");
    }
    if let Some(settings) = settings_override {
        project.settings = settings.clone();
    }

    let mut passes = true;
    let mut outcomes = Vec::new();
    let mut failures = Vec::new();
    for (id, result) in project.evaluate_all() {
        match result {
            Ok(outcome) => {
                passes &= outcome.passes;
                outcomes.push(outcome);
            }
            Err(e) => {
                passes = false;
                failures.push(json!({ "id": id, "error": e }));
            }
        }
    }

    let body = match format {
        ExportFormat::Json => report::to_json_at(
            &json!({ "project": &project.meta, "outcomes": &outcomes, "failures": &failures }),
            now,
        )?,
        ExportFormat::Csv => {
            let mut combined = SummaryTable::new(format!("Project {}", project.meta.job_id));
            for outcome in &outcomes {
                for row in outcome.summary.rows.iter().chain(&outcome.safety.rows) {
                    combined.push(format!("{} / {}", outcome.label, row.parameter), row.value.clone());
                }
            }
            report::to_csv(&combined)?
        }
        ExportFormat::Text => {
            let mut parts: Vec<String> = outcomes
                .iter()
                .map(|o| {
                    let title = format!("{} - {}", o.calc_type, o.label);
                    text_report(&title, o).render(now)
                })
                .collect();
            for f in &failures {
                parts.push(format!("FAILED {}", f));
            }
            parts.join("\n\n")
        }
    };

    Ok(Rendered {
        base_name: if project.meta.job_id.is_empty() {
            "project".to_string()
        } else {
            project.meta.job_id.clone()
        },
        body,
        passes,
    })
}

fn plain_table(table: &SummaryTable) -> String {
    let width = table.rows.iter().map(|r| r.parameter.chars().count()).max().unwrap_or(0);
    let mut out = vec![table.title.clone(), "-".repeat(table.title.chars().count())];
    for row in &table.rows {
        out.push(format!("{:<width$}  {}", row.parameter, row.value, width = width));
    }
    out.join("\n")
}
