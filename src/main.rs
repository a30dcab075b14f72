//! Template Editor CLI
//!
//! Usage:
//!   template-editor [OPTIONS] <COMMAND>
//!
//! Commands:
//!   render    Render a template with the stored field values
//!   vars      List template variables and the fields bound to them
//!   fields    Manage form fields
//!   undo      Restore the previous field list
//!   template  Show or replace the stored template
//!   export    Write the rendered template to template.html

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use template_editor::editor::{FileSaver, Notification, NotificationKind, Notifier, SaveError};
use template_editor::form::{FieldEdit, InputStatus};
use template_editor::store::JsonFileBackend;
use template_editor::{
    render, unique_variables, unresolved, EditorConfig, EditorError, Export, FieldStore,
    TemplateEditor,
};

#[derive(Parser)]
#[command(name = "template-editor")]
#[command(about = "Fill HTML template placeholders from a stored form")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store file, overriding the configured location
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template with the stored field values
    Render {
        /// Template file (uses the stored template if not provided)
        template: Option<PathBuf>,

        /// Override a value, e.g. --var NAME="Davey Grohley"
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        vars: Vec<(String, String)>,
    },
    /// List template variables and the fields bound to them
    Vars {
        /// Template file (uses the stored template if not provided)
        template: Option<PathBuf>,
    },
    /// Manage form fields
    Fields {
        #[command(subcommand)]
        action: FieldsAction,
    },
    /// Restore the previous field list
    Undo,
    /// Show or replace the stored template
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Write the rendered template to a file
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum FieldsAction {
    /// List fields in form order
    List,
    /// Append a new field
    Add,
    /// Remove the field at INDEX
    Remove { index: usize },
    /// Move the field at FROM to position TO
    Move { from: usize, to: usize },
    /// Set the value of the field bound to VARIABLE
    Set { variable: String, value: String },
    /// Edit properties of the field at INDEX
    Edit {
        index: usize,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        variable: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        placeholder: Option<String>,
    },
    /// Empty every field value
    Clear,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Print the stored template
    Show,
    /// Store a new template
    Set {
        /// Template file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

/// Prints notifications on stderr and remembers whether any was an error
struct StderrNotifier {
    failed: Rc<Cell<bool>>,
}

impl Notifier for StderrNotifier {
    fn show(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => eprintln!("{}", notification.message),
            NotificationKind::Error => {
                self.failed.set(true);
                eprintln!("Error: {}", notification.message);
            }
        }
    }
}

/// Saves exports into a directory
struct DirectorySaver {
    dir: PathBuf,
    force: bool,
}

impl FileSaver for DirectorySaver {
    fn save(&mut self, export: &Export, contents: &str) -> Result<(), SaveError> {
        let path = self.dir.join(&export.file_name);
        if path.exists() && !self.force {
            return Err(SaveError::Failed(format!(
                "{} exists, pass --force to overwrite",
                path.display()
            )));
        }
        fs::create_dir_all(&self.dir).map_err(|e| SaveError::Failed(e.to_string()))?;
        fs::write(&path, contents).map_err(|e| SaveError::Failed(e.to_string()))?;
        info!(path = %path.display(), mime = %export.mime_type, "exported");
        Ok(())
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "template_editor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let failed = Rc::new(Cell::new(false));

    if let Err(e) = run(cli, Rc::clone(&failed)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    if failed.get() {
        std::process::exit(1);
    }
}

fn run(cli: Cli, failed: Rc<Cell<bool>>) -> Result<(), EditorError> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    if let Some(store) = cli.store {
        config = config.with_store_path(store);
    }

    let store = FieldStore::open(config.store_path.clone())?;
    let mut editor = TemplateEditor::new(store, config).with_notifier(StderrNotifier { failed });
    editor.start()?;

    match cli.command {
        Command::Render { template, vars } => {
            let source = match template {
                Some(path) => fs::read_to_string(path)?,
                None => editor.state().template.clone(),
            };
            let mut variables: HashMap<String, String> = editor.form().variables();
            variables.extend(vars);
            for token in unresolved(&source, &variables) {
                warn!(variable = %token.name, "no value for placeholder");
            }
            println!("{}", render(&source, &variables));
        }
        Command::Vars { template } => {
            let source = match template {
                Some(path) => fs::read_to_string(path)?,
                None => editor.state().template.clone(),
            };
            let variables = editor.form().variables();
            for name in unique_variables(&source) {
                let marker = if variables.contains_key(&name) { "ok" } else { "unbound" };
                println!("{:<8} {}", marker, name);
            }
            let used = unique_variables(&source);
            for field in editor.form().fields() {
                if !used.contains(&field.bind_to_variable) {
                    println!("{:<8} {}", "unused", field.bind_to_variable);
                }
            }
        }
        Command::Fields { action } => run_fields(&mut editor, action)?,
        Command::Undo => match editor.undo()? {
            Some(_) => println!("Restored {} field(s)", editor.form().fields().len()),
            None => println!("Nothing to undo"),
        },
        Command::Template { action } => match action {
            TemplateAction::Show => print!("{}", editor.state().template),
            TemplateAction::Set { file } => {
                let template = match file {
                    Some(path) => fs::read_to_string(path)?,
                    None => {
                        let mut buffer = String::new();
                        io::stdin().read_to_string(&mut buffer)?;
                        buffer
                    }
                };
                editor.set_template(template)?;
                let missing = editor.form().missing();
                if !missing.is_empty() {
                    println!("Fields not used by template: {}", missing.join(", "));
                }
            }
        },
        Command::Export { output, force } => {
            let mut editor = editor.with_file_saver(DirectorySaver { dir: output, force });
            editor.request_download()?;
        }
    }

    Ok(())
}

fn run_fields(
    editor: &mut TemplateEditor<JsonFileBackend>,
    action: FieldsAction,
) -> Result<(), EditorError> {
    match action {
        FieldsAction::List => {
            for (index, input) in editor.form().inputs().iter().enumerate() {
                let status = match input.status {
                    InputStatus::Satisfied => "used",
                    InputStatus::Missing => "missing",
                };
                println!(
                    "{:>2}  {:<20} {:<20} {:<8} {}",
                    index, input.variable, input.label, status, input.value
                );
            }
        }
        FieldsAction::Add => editor.add_field()?,
        FieldsAction::Remove { index } => {
            let removed = editor.remove_field(index)?;
            println!("Removed {}", removed.bind_to_variable);
        }
        FieldsAction::Move { from, to } => editor.move_field(from, to)?,
        FieldsAction::Set { variable, value } => {
            if !editor.set_input_value(&variable, value)? {
                eprintln!("No field is bound to {}", variable);
                std::process::exit(1);
            }
        }
        FieldsAction::Edit {
            index,
            label,
            variable,
            value,
            placeholder,
        } => {
            let edits: Vec<_> = [
                label.map(FieldEdit::Label),
                variable.map(FieldEdit::BindToVariable),
                value.map(FieldEdit::Value),
                placeholder.map(FieldEdit::Placeholder),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !edits.is_empty() {
                editor.edit_field_with(index, edits)?;
            }
        }
        FieldsAction::Clear => editor.clear_form()?,
    }
    Ok(())
}
