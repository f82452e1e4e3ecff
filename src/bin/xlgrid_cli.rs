//! CLI tool for xlgrid - renders one sheet of an XLSX file as HTML
//!
//! Usage:
//!   xlgrid_cli <input.xlsx>                      # HTML of the first sheet to stdout
//!   xlgrid_cli <input.xlsx> --sheet Totals -o out.html
//!   xlgrid_cli <input.xlsx> --label-col 0 --data-start-col 1 --json
//!
//! Set `RUST_LOG=debug` to see what the reader and normalizer are doing.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use std::fs;
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::process::ExitCode;

    use xlgrid::{html, parser, LayoutDescriptor, Result, ViewController};

    #[derive(Parser, Debug)]
    #[command(name = "xlgrid_cli", version, about = "Render a workbook sheet as an HTML table")]
    struct Args {
        /// Workbook to read (.xlsx)
        input: PathBuf,

        /// Sheet to render (defaults to the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Grid row holding the column titles
        #[arg(long, env = "XLGRID_HEADER_ROW")]
        header_row: Option<usize>,

        /// Grid column holding each row's label
        #[arg(long, env = "XLGRID_LABEL_COL")]
        label_col: Option<usize>,

        /// First grid column holding data
        #[arg(long, env = "XLGRID_DATA_START_COL")]
        data_start_col: Option<usize>,

        /// JSON layout file ({"headerRow":0,"labelCol":1,"dataStartCol":2}); flags override it
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Print the view state as JSON instead of HTML
        #[arg(long)]
        json: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    }

    fn resolve_layout(args: &Args) -> Result<LayoutDescriptor> {
        let mut layout = match &args.layout {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => LayoutDescriptor::default(),
        };
        if let Some(row) = args.header_row {
            layout.header_row = row;
        }
        if let Some(col) = args.label_col {
            layout.label_col = col;
        }
        if let Some(col) = args.data_start_col {
            layout.data_start_col = col;
        }
        Ok(layout)
    }

    fn run(args: &Args) -> Result<()> {
        let layout = resolve_layout(args)?;
        let data = fs::read(&args.input)?;

        let (workbook, metrics) = parser::parse_with_metrics(&data)?;
        log::debug!(
            "Parsed {} sheets, {} cells in {:.1}ms",
            metrics.sheets_count,
            metrics.total_cells,
            metrics.parse_ms
        );

        let mut controller = ViewController::with_layout(layout);
        controller.load_workbook(workbook);
        if let Some(sheet) = &args.sheet {
            controller.select_sheet(sheet)?;
        }

        let state = controller.state();
        let rendered = if args.json {
            serde_json::to_string_pretty(state)?
        } else {
            html::render(state)
        };

        match &args.output {
            Some(path) => fs::write(path, rendered)?,
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

        let args = Args::parse();
        match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
