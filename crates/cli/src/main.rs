use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use geocon::chart::{klein_geodesic, HyperbolicChart};
use geocon::curve2::Curve2;
use geocon::derive::{derive_curve, Curve};
use geocon::doc::{ConstructionDoc, GeometryMode, Ref, RefKind};
use geocon::tool::{apply_tool, build_tool, replay_tool, Value};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "geocon")]
#[command(about = "Realize construction documents and record/replay custom tools")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Poincare,
    Klein,
    Hyperboloid,
}

impl From<ChartArg> for HyperbolicChart {
    fn from(c: ChartArg) -> Self {
        match c {
            ChartArg::Poincare => HyperbolicChart::Poincare,
            ChartArg::Klein => HyperbolicChart::Klein,
            ChartArg::Hyperboloid => HyperbolicChart::Hyperboloid,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Realize every line and circle of a document (null when degenerate)
    Derive {
        #[arg(long)]
        doc: PathBuf,
        /// View chart for Poincaré disk documents
        #[arg(long, value_enum, default_value = "poincare")]
        chart: ChartArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Record how an object is built from chosen inputs
    BuildTool {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        name: String,
        /// Input object as kind:id (repeat, in order)
        #[arg(long = "input")]
        inputs: Vec<String>,
        #[arg(long)]
        output: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Evaluate a tool on other inputs; with --apply, write the extended document
    Replay {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        tool: PathBuf,
        #[arg(long = "input")]
        inputs: Vec<String>,
        #[arg(long)]
        apply: Option<PathBuf>,
    },
    /// Print version information as JSON
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Derive { doc, chart, out } => derive(doc, chart.into(), out),
        Action::BuildTool {
            doc,
            name,
            inputs,
            output,
            out,
        } => build(doc, name, inputs, output, out),
        Action::Replay {
            doc,
            tool,
            inputs,
            apply,
        } => replay(doc, tool, inputs, apply),
        Action::Report => report(),
    }
}

fn parse_ref(s: &str) -> Result<Ref> {
    Ref::parse(s).with_context(|| format!("bad object ref {s:?}, expected kind:id"))
}

fn parse_refs(list: &[String]) -> Result<Vec<Ref>> {
    list.iter().map(|s| parse_ref(s)).collect()
}

#[derive(Serialize)]
struct DerivedCurve {
    #[serde(rename = "ref")]
    key: String,
    curve: Option<Curve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    klein: Option<Curve2>,
}

#[derive(Serialize)]
struct DerivedPoint {
    #[serde(rename = "ref")]
    key: String,
    label: String,
    pos: Option<[f64; 3]>,
}

#[derive(Serialize)]
struct DeriveReport {
    mode: GeometryMode,
    chart: HyperbolicChart,
    curves: Vec<DerivedCurve>,
    points: Vec<DerivedPoint>,
}

/// Curves in canonical coordinates; points (and Klein chords) in the view chart.
fn derive_report(doc: &ConstructionDoc, chart: HyperbolicChart) -> DeriveReport {
    let disk = doc.mode == GeometryMode::PoincareDisk;
    let curves = doc
        .curve_refs()
        .map(|c| {
            let klein = match (disk, chart, c.kind) {
                (true, HyperbolicChart::Klein, geocon::doc::CurveKind::Line) => doc
                    .line(c.id)
                    .and_then(|l| Some((doc.point(l.p1)?.pos2(), doc.point(l.p2)?.pos2())))
                    .and_then(|(p, q)| klein_geodesic(p, q)),
                _ => None,
            };
            DerivedCurve {
                key: Ref::from(c).key(),
                curve: derive_curve(doc.mode, doc, c),
                klein,
            }
        })
        .collect();
    let points = doc
        .points
        .iter()
        .map(|p| {
            let pos = if disk {
                chart.from_poincare(p.pos2())
            } else {
                Some(p.pos3())
            };
            DerivedPoint {
                key: Ref::point(p.id).key(),
                label: p.label.clone(),
                pos: pos.map(|v| [v.x, v.y, v.z]),
            }
        })
        .collect();
    DeriveReport {
        mode: doc.mode,
        chart: if disk { chart } else { HyperbolicChart::default() },
        curves,
        points,
    }
}

fn derive(doc_path: PathBuf, chart: HyperbolicChart, out: Option<PathBuf>) -> Result<()> {
    let doc = io::read_doc(&doc_path)?;
    tracing::info!(doc = %doc_path.display(), mode = %doc.mode, "derive");
    let report = derive_report(&doc, chart);
    match out {
        Some(path) => {
            io::write_json(&path, &report)?;
            provenance::write_sidecar(
                &path,
                provenance::Payload {
                    command: "derive",
                    params: json!({ "doc": doc_path, "chart": chart }),
                },
            )?;
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn build(doc_path: PathBuf, name: String, inputs: Vec<String>, output: String, out: PathBuf) -> Result<()> {
    let doc = io::read_doc(&doc_path)?;
    let refs = parse_refs(&inputs)?;
    let output_ref = parse_ref(&output)?;
    tracing::info!(doc = %doc_path.display(), name = %name, inputs = ?inputs, output = %output, "build-tool");
    let tool = build_tool(doc.mode, &doc, &name, &refs, output_ref)
        .with_context(|| format!("building tool {name:?}"))?;
    io::write_json(&out, &tool)?;
    provenance::write_sidecar(
        &out,
        provenance::Payload {
            command: "build-tool",
            params: json!({ "doc": doc_path, "name": name, "inputs": inputs, "output": output }),
        },
    )?;
    Ok(())
}

fn value_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Point(p) => json!({ "kind": RefKind::Point, "pos": [p.x, p.y, p.z] }),
        Value::Line { curve, .. } => json!({ "kind": RefKind::Line, "curve": curve }),
        Value::Circle { curve, .. } => json!({ "kind": RefKind::Circle, "curve": curve }),
    }
}

fn replay(doc_path: PathBuf, tool_path: PathBuf, inputs: Vec<String>, apply: Option<PathBuf>) -> Result<()> {
    let mut doc = io::read_doc(&doc_path)?;
    let tool = io::read_tool(&tool_path)?;
    let refs = parse_refs(&inputs)?;
    tracing::info!(tool = %tool.name, inputs = ?inputs, apply = apply.is_some(), "replay");
    let outcome = replay_tool(doc.mode, &doc, &tool, &refs)
        .with_context(|| format!("replaying tool {:?}", tool.name))?;
    let mut result = json!({ "tool": tool.name, "output": value_json(&outcome.output) });
    if let Some(path) = apply {
        let out = apply_tool(doc.mode, &mut doc, &tool, &refs)?;
        io::write_json(&path, &doc)?;
        provenance::write_sidecar(
            &path,
            provenance::Payload {
                command: "replay",
                params: json!({ "doc": doc_path, "tool": tool_path, "inputs": inputs }),
            },
        )?;
        result["applied"] = json!(out.key());
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "geocon": geocon::VERSION,
        "modes": GeometryMode::ALL,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocon::doc::CurveRef;
    use nalgebra::vector;

    #[test]
    fn refs_parse_or_explain() {
        assert_eq!(parse_ref("line:4").unwrap(), Ref::line(4));
        let err = parse_ref("segment:4").unwrap_err();
        assert!(err.to_string().contains("kind:id"));
    }

    #[test]
    fn degenerate_curves_report_null() {
        let mut doc = ConstructionDoc::new(GeometryMode::Euclidean);
        let a = doc.add_free_point(vector![0.0, 0.0, 0.0]);
        let b = doc.add_free_point(vector![0.0, 0.0, 0.0]);
        let c = doc.add_free_point(vector![1.0, 0.0, 0.0]);
        doc.add_line(a, b).unwrap();
        doc.add_circle(a, c).unwrap();
        let report = derive_report(&doc, HyperbolicChart::Poincare);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["curves"][0]["curve"].is_null());
        assert!(json["curves"][1]["curve"].is_object());
        assert_eq!(json["points"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn klein_chart_adds_chords_for_disk_lines() {
        let mut doc = ConstructionDoc::new(GeometryMode::PoincareDisk);
        let a = doc.add_free_point(vector![0.2, 0.1, 0.0]);
        let b = doc.add_free_point(vector![-0.3, 0.4, 0.0]);
        let l = doc.add_line(a, b).unwrap();
        doc.add_point_on(CurveRef::line(l), vector![0.0, 0.2, 0.0]).unwrap();
        let report = derive_report(&doc, HyperbolicChart::Klein);
        assert!(report.curves[0].klein.is_some_and(|k| k.is_line()));
        let poincare = derive_report(&doc, HyperbolicChart::Poincare);
        assert!(poincare.curves[0].klein.is_none());
    }
}
