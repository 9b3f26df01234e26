// ABOUTME: CLI for applying console DOM operations to an HTML document.
// ABOUTME: Reads a document from a file or stdin, runs one operation, and prints the result.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deckhand_console::{
    build_render_params, class_members_of, encode_as_html, quick_select, select_one,
    set_default_in_form_selects, toggle_class_children, PreviewClient, RenderControls, Toggle,
};
use dom_query::Document;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "deckhand")]
#[command(about = "Apply console DOM operations to an HTML document")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the elements carrying a class under a container, as JSON.
    Members {
        /// HTML document path, or "-" to read from stdin.
        file: String,
        /// Container selector to search under.
        #[arg(long)]
        container: String,
        /// Marker class to match.
        #[arg(long)]
        class: String,
        /// Include the container itself when it carries the class.
        #[arg(long)]
        include_container: bool,
    },
    /// Check a percentage of a checkbox group, clearing the rest.
    QuickSelect {
        file: String,
        #[arg(long)]
        container: String,
        #[arg(long)]
        class: String,
        /// Percentage of the group to check (0 checks none, 100 all).
        #[arg(long)]
        percentage: f64,
        /// Output file path (default: stdout).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Check only the first input of a group.
    SelectOne {
        file: String,
        #[arg(long)]
        container: String,
        #[arg(long)]
        class: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Set, clear, or flip a class on every element carrying a marker class.
    Toggle {
        file: String,
        #[arg(long)]
        container: String,
        /// Marker class selecting the elements to change.
        #[arg(long)]
        selection_class: String,
        /// One of: set, clear, flip.
        #[arg(long)]
        mode: String,
        /// Class to set, clear, or flip.
        #[arg(long)]
        class: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Move every single-selection dropdown in a form to the given value.
    SetSelects {
        file: String,
        #[arg(long)]
        form: String,
        #[arg(long)]
        value: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Print the render parameters for the current filter state.
    Params {
        file: String,
        /// Group-by column (default: read from the group-by control).
        #[arg(long)]
        group_by: Option<String>,
        /// Comma-separated column names.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// HTML-escape a piece of text.
    Encode {
        text: String,
    },
    /// Refresh the plan preview panel from an endpoint.
    Refresh {
        file: String,
        /// Endpoint receiving the plan POST.
        #[arg(long)]
        endpoint: String,
        /// Fabric identifier forwarded to the server.
        #[arg(long)]
        fabric: String,
        /// Override the plan radio-group name.
        #[arg(long)]
        plan_input_name: Option<String>,
        /// Override the preview target selector.
        #[arg(long)]
        preview_selector: Option<String>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

/// Load a document from a path, or from stdin when the path is "-".
fn load_document(target: &str) -> Result<Document> {
    let html = if target == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading document from stdin")?;
        buf
    } else {
        fs::read_to_string(target).with_context(|| format!("reading document {}", target))?
    };
    Ok(Document::from(html.as_str()))
}

/// Print to stdout or write to the output file when one was given.
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing to {:?}", path))
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn parse_toggle(mode: &str) -> Result<Toggle> {
    match mode.to_lowercase().as_str() {
        "set" => Ok(Toggle::Set),
        "clear" => Ok(Toggle::Clear),
        "flip" => Ok(Toggle::Flip),
        other => bail!("unknown toggle mode {:?} (expected set, clear, or flip)", other),
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Members {
            file,
            container,
            class,
            include_container,
        } => {
            let doc = load_document(&file)?;
            let members = class_members_of(&doc, &container, &class, include_container)?;
            let rendered: Vec<String> = members.iter().map(|m| m.html().to_string()).collect();
            let report = json!({
                "container": container,
                "class": class,
                "count": rendered.len(),
                "members": rendered,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::QuickSelect {
            file,
            container,
            class,
            percentage,
            output,
        } => {
            let doc = load_document(&file)?;
            let checked = quick_select(&doc, &container, &class, percentage)?;
            eprintln!("checked {} input(s)", checked);
            write_output(&doc.html(), output.as_ref())?;
        }
        Command::SelectOne {
            file,
            container,
            class,
            output,
        } => {
            let doc = load_document(&file)?;
            select_one(&doc, &container, &class)?;
            write_output(&doc.html(), output.as_ref())?;
        }
        Command::Toggle {
            file,
            container,
            selection_class,
            mode,
            class,
            output,
        } => {
            let doc = load_document(&file)?;
            let instruction = parse_toggle(&mode)?;
            toggle_class_children(&doc, &container, &selection_class, instruction, &class)?;
            write_output(&doc.html(), output.as_ref())?;
        }
        Command::SetSelects {
            file,
            form,
            value,
            output,
        } => {
            let doc = load_document(&file)?;
            let matched = set_default_in_form_selects(&doc, &form, &value)?;
            eprintln!("last dropdown matched: {}", matched);
            write_output(&doc.html(), output.as_ref())?;
        }
        Command::Params {
            file,
            group_by,
            columns,
        } => {
            let doc = load_document(&file)?;
            let params = build_render_params(
                &doc,
                group_by.as_deref(),
                &columns,
                &RenderControls::default(),
            )?;
            println!("{}", params);
        }
        Command::Encode { text } => {
            println!("{}", encode_as_html(&text));
        }
        Command::Refresh {
            file,
            endpoint,
            fabric,
            plan_input_name,
            preview_selector,
            output,
        } => {
            let doc = load_document(&file)?;
            let mut builder = PreviewClient::builder();
            if let Some(name) = plan_input_name {
                builder = builder.plan_input_name(name);
            }
            if let Some(selector) = preview_selector {
                builder = builder.preview_selector(selector);
            }
            let client = builder.build();
            let outcome = client.refresh_preview(&doc, &endpoint, &fabric).await?;
            eprintln!("refresh outcome: {}", outcome);
            write_output(&doc.html(), output.as_ref())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
