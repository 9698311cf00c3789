//! Sequential execution of import and export steps

use log::{debug, info, warn};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codegen::{self, assign_package, output_path, ExportError};
use crate::core::config::{Config, Layered, ParameterSource};
use crate::core::storage::{Storage, StorageError};
use crate::core::templates::{TemplateStore, TemplateStoreError};
use crate::entities::{ExportStep, ImportStep, ModelDefinition, UmlJob};
use crate::importer::{self, ImportError};
use crate::job::params;
use crate::job::report::{JobReport, StepOutcome, StepPhase};
use crate::json::diagnostics::parse_value;
use crate::json::JsonSyntaxError;

/// Failures that abort the whole run
#[derive(Debug, Error, Diagnostic)]
pub enum JobError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] JsonSyntaxError),

    #[error("invalid job document: {0}")]
    #[diagnostic(
        code(umlt::job::invalid),
        help("a job is an object with `importSteps` and `exportSteps` arrays")
    )]
    Invalid(#[from] serde_json::Error),
}

/// Failures that end a single step
#[derive(Debug, Error)]
pub enum StepError {
    #[error("import step '{0}' has neither `document` nor `source`")]
    MissingSource(String),

    #[error("model destination {0} was already written by an earlier step")]
    DuplicateDestination(PathBuf),

    #[error("no model to export from; set `model` or add an import step")]
    NoModel,

    #[error("model artifact {path} is not a valid model: {source}")]
    Model {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Template(#[from] TemplateStoreError),
}

/// Where a run writes its artifacts, relative to the storage root
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub model_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            model_dir: PathBuf::from("generated/uml"),
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            model_dir: config.model_dir(),
        }
    }
}

/// Runs job documents against a storage backend
pub struct JobRunner<'a, S: Storage + ?Sized> {
    storage: &'a S,
    templates: &'a TemplateStore,
    options: RunOptions,
}

impl<'a, S: Storage + ?Sized> JobRunner<'a, S> {
    pub fn new(storage: &'a S, templates: &'a TemplateStore, options: RunOptions) -> Self {
        Self {
            storage,
            templates,
            options,
        }
    }

    /// Parse and execute a job document
    ///
    /// Only a malformed job document is an error; step failures are
    /// recorded in the report.
    pub fn run<P: ParameterSource + ?Sized>(
        &self,
        text: &str,
        params: &P,
    ) -> Result<JobReport, JobError> {
        let job = self.parse(text, "job.json", params)?;
        Ok(self.execute(job))
    }

    /// Parse a job document, resolving `${key}` parameters
    pub fn parse<P: ParameterSource + ?Sized>(
        &self,
        text: &str,
        filename: &str,
        params: &P,
    ) -> Result<UmlJob, JobError> {
        let mut document = parse_value(text, filename)?;
        let local = params::local_parameters(&document);
        let misses = params::substitute(&mut document, &Layered(&local, params));
        if misses > 0 {
            warn!(job = filename, missing = misses; "Unresolved job parameters replaced with '{}'", params::NOT_FOUND);
        }
        Ok(serde_json::from_value(document)?)
    }

    /// Execute every step in declaration order, imports first
    pub fn execute(&self, mut job: UmlJob) -> JobReport {
        info!(
            job = job.name.as_str(),
            imports = job.import_steps.len(),
            exports = job.export_steps.len();
            "Running job"
        );

        let mut outcomes = Vec::new();
        let mut imported: Vec<PathBuf> = Vec::new();

        for step in job.import_steps.iter_mut() {
            let outcome = match self.run_import(step, &imported) {
                Ok(written) => {
                    imported.extend(written.iter().cloned());
                    StepOutcome::succeeded(
                        &step.name,
                        StepPhase::Import,
                        format!("imported model '{}'", model_label(step)),
                        written,
                    )
                }
                Err(e) => {
                    warn!(step = step.name.as_str(), error:% = e; "Import step failed");
                    StepOutcome::failed(&step.name, StepPhase::Import, e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        for step in job.export_steps.iter_mut() {
            let outcome = match self.run_export(step, &imported) {
                Ok(written) => {
                    let message = format!("rendered {} file(s)", written.len());
                    StepOutcome::succeeded(&step.name, StepPhase::Export, message, written)
                }
                Err(e) => {
                    warn!(step = step.name.as_str(), error:% = e; "Export step failed");
                    StepOutcome::failed(&step.name, StepPhase::Export, e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        JobReport { job, outcomes }
    }

    /// Import a diagram, persist the model, and attach the re-read copy
    ///
    /// `claimed` holds the model files already written by this run. A
    /// derived destination that collides with one gets the step id appended;
    /// an explicit `destination` that collides fails the step.
    pub fn run_import(
        &self,
        step: &mut ImportStep,
        claimed: &[PathBuf],
    ) -> Result<Vec<PathBuf>, StepError> {
        let document = match (&step.document, &step.source) {
            (Some(document), _) => document.clone(),
            (None, Some(source)) => self.storage.read(Path::new(source))?,
            (None, None) => return Err(StepError::MissingSource(step.name.clone())),
        };

        let name = model_name(step);
        let importer = importer::for_name(&step.importer)?;
        let model = importer.import(&document, &name)?;

        let destination = match &step.destination {
            Some(explicit) => {
                let destination = PathBuf::from(explicit);
                if claimed.contains(&destination) {
                    return Err(StepError::DuplicateDestination(destination));
                }
                destination
            }
            None => {
                let derived = self.options.model_dir.join(format!("{}.json", name));
                if claimed.contains(&derived) {
                    self.options
                        .model_dir
                        .join(format!("{}-{}.json", name, step.id))
                } else {
                    derived
                }
            }
        };

        let text = model.to_json_pretty().map_err(|source| StepError::Model {
            path: destination.clone(),
            source,
        })?;
        self.storage.write(&destination, &text)?;

        // The export phase consumes what was persisted, not the in-memory value
        let persisted = self.read_model(&destination)?;
        debug!(step = step.name.as_str(), destination:? = destination; "Model written");

        step.destination = Some(destination.to_string_lossy().into_owned());
        step.model = Some(persisted);
        Ok(vec![destination])
    }

    /// Render the step's definition, or every `target` component of its
    /// models, and write the results
    pub fn run_export(
        &self,
        step: &mut ExportStep,
        imported: &[PathBuf],
    ) -> Result<Vec<PathBuf>, StepError> {
        let exporter = codegen::for_name(&step.exporter)?;

        if step.path.is_empty() {
            return Err(ExportError::missing(step, "path").into());
        }

        if step.template.is_none() {
            let file = step
                .template_file()
                .ok_or_else(|| ExportError::missing(step, "template"))?;
            step.template = Some(self.templates.load(self.storage, &file)?);
        }

        let mut definitions = Vec::new();
        match &step.definition {
            Some(definition) => definitions.push((definition.clone(), None)),
            None => {
                for model in self.models_for(step, imported)? {
                    for component in model.components(step.target) {
                        definitions.push((component, model.default_package.clone()));
                    }
                }
            }
        }

        let mut written = Vec::new();
        for (mut definition, default_package) in definitions {
            assign_package(&mut definition, step.package.as_ref(), default_package.as_ref());

            let location = output_path(
                &self.options.output_dir,
                &step.path,
                definition.package(),
                definition.name(),
                &step.file_extension,
            );

            let mut single = step.clone();
            single.definition = Some(definition);
            let code = exporter.export(&single)?;

            self.storage.write(&location, &code)?;
            debug!(step = step.name.as_str(), location:? = location; "Code written");

            step.code = Some(code);
            written.push(location);
        }

        Ok(written)
    }

    fn models_for(
        &self,
        step: &ExportStep,
        imported: &[PathBuf],
    ) -> Result<Vec<ModelDefinition>, StepError> {
        let locations: Vec<PathBuf> = match &step.model {
            Some(model) => vec![PathBuf::from(model)],
            None => imported.to_vec(),
        };
        if locations.is_empty() {
            return Err(StepError::NoModel);
        }
        locations.iter().map(|l| self.read_model(l)).collect()
    }

    fn read_model(&self, location: &Path) -> Result<ModelDefinition, StepError> {
        let text = self.storage.read(location)?;
        ModelDefinition::from_json(&text).map_err(|source| StepError::Model {
            path: location.to_path_buf(),
            source,
        })
    }
}

/// Source file stem when the step reads a file, the step name otherwise
fn model_name(step: &ImportStep) -> String {
    step.source
        .as_deref()
        .and_then(|source| Path::new(source).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| step.name.clone())
}

fn model_label(step: &ImportStep) -> &str {
    step.model.as_ref().map_or("", |m| m.name.as_str())
}
