mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pdf_annotate::{AnnotateError, AnnotationSettings, FontWeight, Position, Session};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pdfa", about = "Add borders, page numbers and footers to PDF pages", version)]
struct Cli {
    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and page sizes
    Info {
        /// Input PDF file
        input: PathBuf,
    },

    /// Annotate selected pages and write a new PDF
    Annotate {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (defaults to modified_<input> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pages to annotate, 1-based, in numbering order (e.g. 3,1,2)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "all")]
        select: Vec<usize>,

        /// Annotate every page in document order
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Write the default batch template as JSON
    Template {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct TemplateArgs {
    /// Start from a JSON template instead of the built-in one
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Draw the border
    #[arg(long, overrides_with = "no_border")]
    border: bool,

    /// Skip the border
    #[arg(long)]
    no_border: bool,

    /// Border margin in points (0-100)
    #[arg(long)]
    margin: Option<f32>,

    /// Draw page numbers
    #[arg(long, overrides_with = "no_page_numbers")]
    page_numbers: bool,

    /// Skip page numbers
    #[arg(long)]
    no_page_numbers: bool,

    /// Page number center, percent of page width
    #[arg(long)]
    number_x: Option<f32>,

    /// Page number baseline, percent of page height from the bottom
    #[arg(long)]
    number_y: Option<f32>,

    /// Page number font size (6-72)
    #[arg(long)]
    number_size: Option<f32>,

    /// Bold page numbers
    #[arg(long)]
    number_bold: bool,

    /// Footer text (enables the footer)
    #[arg(long)]
    footer: Option<String>,

    /// Footer center, percent of page width
    #[arg(long)]
    footer_x: Option<f32>,

    /// Footer baseline, percent of page height from the bottom
    #[arg(long)]
    footer_y: Option<f32>,

    /// Footer font size (6-72)
    #[arg(long)]
    footer_size: Option<f32>,

    /// Bold footer
    #[arg(long)]
    footer_bold: bool,
}

impl TemplateArgs {
    async fn build(self) -> Result<AnnotationSettings> {
        let mut settings = match &self.template {
            Some(path) => AnnotationSettings::load(path)
                .await
                .with_context(|| format!("Failed to read template {}", path.display()))?,
            None => AnnotationSettings::template(),
        };

        if self.border {
            settings.has_border = true;
        }
        if self.no_border {
            settings.has_border = false;
        }
        if let Some(margin) = self.margin {
            settings.border_margin = margin;
        }

        if self.page_numbers {
            settings.has_page_number = true;
        }
        if self.no_page_numbers {
            settings.has_page_number = false;
        }
        settings.page_number_position = override_position(
            settings.page_number_position,
            self.number_x,
            self.number_y,
        );
        if let Some(size) = self.number_size {
            settings.page_number_size = size;
        }
        if self.number_bold {
            settings.page_number_weight = FontWeight::Bold;
        }

        if let Some(text) = self.footer {
            settings.has_footer = true;
            settings.footer_text = text;
        }
        settings.footer_position =
            override_position(settings.footer_position, self.footer_x, self.footer_y);
        if let Some(size) = self.footer_size {
            settings.footer_size = size;
        }
        if self.footer_bold {
            settings.footer_weight = FontWeight::Bold;
        }

        Ok(settings.clamped())
    }
}

fn override_position(position: Position, x: Option<f32>, y: Option<f32>) -> Position {
    Position::new(x.unwrap_or(position.x), y.unwrap_or(position.y))
}

fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(pdf_annotate::output_file_name(&name))
}

async fn info(input: PathBuf) -> Result<()> {
    let doc = pdf_annotate::load_pdf(&input).await?;
    let pages = doc.get_pages();

    println!("{}: {} pages", input.display(), pages.len());
    for (number, page_id) in pages {
        let (width, height) = pdf_annotate::render::get_page_dimensions(&doc, page_id)?;
        println!("  Page {:>4}: {} x {} pt", number, width, height);
    }
    Ok(())
}

async fn annotate(
    input: PathBuf,
    output: Option<PathBuf>,
    select: Vec<usize>,
    all: bool,
    template: TemplateArgs,
) -> Result<()> {
    let template = template.build().await?;
    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = Session::new();
    let page_count = session.open(name, bytes).await?;
    session.set_template(template)?;

    let order: Vec<usize> = if all {
        (0..page_count).collect()
    } else {
        let mut order = Vec::with_capacity(select.len());
        for page in select {
            if page == 0 || page > page_count {
                bail!("Page {} is outside 1..={}", page, page_count);
            }
            order.push(page - 1);
        }
        order
    };

    for index in order {
        session.toggle(index)?;
    }
    println!("{}", session.summary());

    let exported = session.process().await?;
    let output = output.unwrap_or_else(|| default_output(&input));
    tokio::fs::write(&output, &exported.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Annotated → {}", output.display());
    Ok(())
}

async fn write_template(output: PathBuf) -> Result<()> {
    AnnotationSettings::template().save(&output).await?;
    println!("Template → {}", output.display());
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { input } => info(input).await,
        Commands::Annotate {
            input,
            output,
            select,
            all,
            template,
        } => annotate(input, output, select, all, template).await,
        Commands::Template { output } => write_template(output).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logger::level_from_flags(cli.verbose, cli.quiet);
    if let Err(e) = logger::CliLogger::new(level).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AnnotateError>() {
                Some(annotate_err) => {
                    log::error!("{:#}", err);
                    eprintln!("[{}] {}", annotate_err.code(), annotate_err.user_message());
                }
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
