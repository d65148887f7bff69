//! vrender - headless render driver

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use vrender::config::RendererOption;
use vrender::host::recording::{PaintCall, Recorder};
use vrender::host::{MemoryDocument, WrapMode};
use vrender::model::{DriverError, LayerConfig, ScrollOffsets, ViewportSize};
use vrender::state::Renderer;
use vrender::view_state::{RowWindow, ScrollbarThickness, ScrollbarVisibility};

/// Lay out a text file in a virtual viewport and print one frame's paint calls
#[derive(Parser, Debug)]
#[command(name = "vrender")]
#[command(version)]
#[command(about = "Run one render frame over a text file and report the layout")]
pub struct Args {
    /// Text file to load
    pub file: PathBuf,

    /// Container width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Container height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Row height in pixels
    #[arg(long, default_value_t = 16.0)]
    pub line_height: f64,

    /// Character cell width in pixels
    #[arg(long, default_value_t = 8.0)]
    pub char_width: f64,

    /// Gutter width in pixels
    #[arg(long, default_value_t = 40.0)]
    pub gutter_width: f64,

    /// Scrollbar thickness in pixels
    #[arg(long, default_value_t = 12.0)]
    pub scrollbar: f64,

    /// Vertical scroll position in pixels
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub scroll_top: f64,

    /// Soft-wrap at the viewport width
    #[arg(long)]
    pub wrap: bool,

    /// Fold rows START..=END into START (repeatable)
    #[arg(long = "fold", value_name = "START:END")]
    pub folds: Vec<String>,

    /// Autosize the container to at most N lines
    #[arg(long)]
    pub max_lines: Option<u32>,

    /// Renderer option override (repeatable)
    #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_option_pair)]
    pub options: Vec<(String, String)>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_option_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

fn parse_fold(raw: &str) -> Result<(usize, usize), DriverError> {
    let syntax = || DriverError::FoldSyntax(raw.to_string());
    let (start, end) = raw.split_once(':').ok_or_else(syntax)?;
    let start = start.trim().parse().map_err(|_| syntax())?;
    let end = end.trim().parse().map_err(|_| syntax())?;
    Ok((start, end))
}

/// Everything one frame produced.
#[derive(Debug, Serialize)]
struct FrameReport {
    size: ViewportSize,
    scrollbars: ScrollbarVisibility,
    scroll: ScrollOffsets,
    layer: LayerConfig,
    window: RowWindow,
    calls: Vec<PaintCall>,
}

fn main() -> Result<(), DriverError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = vrender::config::load_config_with_precedence(args.config.clone())?;
        let merged = vrender::config::merge_config(config_file);
        let with_env = vrender::config::apply_env_overrides(merged);

        let mut options = args
            .options
            .iter()
            .map(|(name, value)| RendererOption::parse(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(lines) = args.max_lines {
            options.push(RendererOption::MaxLines(Some(lines)));
        }

        vrender::config::apply_cli_overrides(with_env, args.log_file.clone(), &options)
    };

    vrender::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let report = run_frame(&args, config.renderer)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_plain(&mut out, &report)?;
    }
    Ok(())
}

fn run_frame(
    args: &Args,
    renderer_config: vrender::config::RendererConfig,
) -> Result<FrameReport, DriverError> {
    let text = std::fs::read_to_string(&args.file).map_err(|source| DriverError::DocumentRead {
        path: args.file.clone(),
        source,
    })?;

    let mut doc = MemoryDocument::new(&text);
    if args.wrap {
        doc.set_wrap_mode(WrapMode::Viewport);
    }
    for raw in &args.folds {
        let (start, end) = parse_fold(raw)?;
        doc.add_fold(start, end)?;
    }

    let recorder = Recorder::new(args.width, args.height).with_scrollbar_thickness(
        ScrollbarThickness {
            horizontal: args.scrollbar,
            vertical: args.scrollbar,
        },
    );
    recorder.set_gutter_width(args.gutter_width);

    let mut renderer = Renderer::new(recorder.collaborators(), renderer_config);
    renderer.set_session(doc);
    renderer.set_font_metrics(args.line_height, args.char_width);
    renderer.set_scroll_top(args.scroll_top);
    renderer.on_frame();

    info!(
        first_row = renderer.first_visible_row(),
        last_row = renderer.last_visible_row(),
        "frame rendered"
    );

    Ok(FrameReport {
        size: renderer.size(),
        scrollbars: renderer.scrollbars(),
        scroll: renderer.scroll_offsets(),
        layer: LayerConfig::clone(renderer.layer_config()),
        window: renderer.viewport_row_window(),
        calls: recorder.take_calls(),
    })
}

fn write_plain(out: &mut impl Write, report: &FrameReport) -> std::io::Result<()> {
    let layer = &report.layer;
    writeln!(
        out,
        "viewport  {}x{}  scroller {}x{}",
        report.size.width, report.size.height, report.size.scroller_width, report.size.scroller_height
    )?;
    writeln!(
        out,
        "scrollbars  horizontal={} vertical={}",
        report.scrollbars.horizontal, report.scrollbars.vertical
    )?;
    writeln!(out, "scroll  top={} left={}", report.scroll.top, report.scroll.left)?;
    writeln!(
        out,
        "rows  {}..={} (screen {})  offset={}  fully visible {}..={}",
        layer.first_row,
        layer.last_row,
        layer.first_row_screen,
        layer.vertical_offset,
        report.window.first_fully_visible_row(),
        report.window.last_fully_visible_row()
    )?;
    writeln!(
        out,
        "content  width={} max_height={} min_height={} gutter_offset={}",
        layer.content_width, layer.max_height, layer.min_height, layer.gutter_offset
    )?;
    writeln!(out, "calls")?;
    for call in &report.calls {
        writeln!(out, "  {}", serde_json::to_string(call).map_err(std::io::Error::other)?)?;
    }
    Ok(())
}
