//! Configuration context
//!
//! [`ConfigContext`] owns every live option value of a run and drives its
//! lifecycle:
//!
//! ```text
//! Unconfigured --configure--> Configuring --> Rigid --freeze--> Frozen
//!                                  ^            |
//!                                  +------------+  (model extension only)
//! ```
//!
//! Values are applied with strict precedence: defaults, then an optional
//! configuration file, then explicit overrides. Each live value carries a
//! [`Provenance`] tag recording which of the three layers wrote it.

use crate::identity::{self, RunIdentity};
use crate::logging::{LogSink, SinkFactory, Verbosity, tracing_sink_factory};
use crate::snapshot::Snapshot;
use crate::{Error, LifecycleError, ReadinessError, Result};
use chrono::Local;
use pilot_fs::{NormalizedPath, PathNormalizer, PilotPath, io};
use pilot_git::WorkingAreaResolver;
use pilot_meta::constants::{
    ACTIVE_MODEL_NAMES, CONFIG_FILE, EXPERIMENT_NAME, PROJECT_NAME, RUN_NUMBER,
};
use pilot_meta::groups::builtin_groups;
use pilot_meta::{
    Action, ActionSelector, GroupScope, ModelOptionResolver, OptionDescriptor, OptionGroup,
    OptionRegistry, OptionValue, SelectionError,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle phase of a [`ConfigContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationState {
    Unconfigured,
    Configuring,
    Rigid,
    Frozen,
}

impl fmt::Display for ConfigurationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigurationState::Unconfigured => "unconfigured",
            ConfigurationState::Configuring => "configuring",
            ConfigurationState::Rigid => "rigid",
            ConfigurationState::Frozen => "frozen",
        };
        f.write_str(name)
    }
}

/// Layer that wrote an option's live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Default,
    File,
    Cli,
}

impl Provenance {
    fn tag(&self) -> &'static str {
        match self {
            Provenance::Default => "DEFAULT",
            Provenance::File => "FILE",
            Provenance::Cli => "CLI",
        }
    }
}

/// Everything a context needs besides the values of a run.
///
/// Defaults wire up the built-in groups and models, discover the working
/// area from the process directory and log through a [`TracingSink`].
///
/// [`TracingSink`]: crate::logging::TracingSink
#[derive(Clone)]
pub struct ContextOptions {
    groups: Vec<OptionGroup>,
    models: ModelOptionResolver,
    allowed_models: Vec<String>,
    runs_root: NormalizedPath,
    start_dir: PathBuf,
    working_area: WorkingAreaResolver,
    snapshot_name: String,
    sink_factory: SinkFactory,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            groups: builtin_groups(),
            models: ModelOptionResolver::with_builtins(),
            allowed_models: ACTIVE_MODEL_NAMES.iter().map(|m| m.to_string()).collect(),
            runs_root: NormalizedPath::new(PilotPath::RunsDir.as_str()),
            start_dir: PathBuf::from("."),
            working_area: WorkingAreaResolver::default(),
            snapshot_name: PilotPath::Snapshot.as_str().to_string(),
            sink_factory: tracing_sink_factory(),
        }
    }
}

impl fmt::Debug for ContextOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextOptions")
            .field("groups", &self.groups.iter().map(OptionGroup::name).collect::<Vec<_>>())
            .field("models", &self.models)
            .field("allowed_models", &self.allowed_models)
            .field("runs_root", &self.runs_root)
            .field("start_dir", &self.start_dir)
            .field("working_area", &self.working_area)
            .field("snapshot_name", &self.snapshot_name)
            .finish_non_exhaustive()
    }
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the phase groups.
    pub fn with_groups(mut self, groups: Vec<OptionGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Add one more phase group.
    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_models(mut self, models: ModelOptionResolver) -> Self {
        self.models = models;
        self
    }

    pub fn with_allowed_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Directory default output areas are created under.
    pub fn with_runs_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.runs_root = root.into();
        self
    }

    /// Directory the working area is discovered from.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = dir.into();
        self
    }

    pub fn with_working_area(mut self, resolver: WorkingAreaResolver) -> Self {
        self.working_area = resolver;
        self
    }

    /// File name of the snapshot; its extension picks the format.
    pub fn with_snapshot_name(mut self, name: impl Into<String>) -> Self {
        self.snapshot_name = name.into();
        self
    }

    pub fn with_sink_factory(mut self, factory: SinkFactory) -> Self {
        self.sink_factory = factory;
        self
    }

    fn default_of(&self, option: &str) -> Option<&OptionValue> {
        self.groups
            .iter()
            .find_map(|g| g.get(option))
            .and_then(|o| o.default.as_ref())
    }
}

/// Inputs of [`ConfigContext::configure`].
///
/// `run_number`, `experiment_name` and `config_file` are ordinary options
/// and travel as overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigureRequest {
    pub verbosity: Verbosity,
    pub output_area: Option<NormalizedPath>,
    pub model_name: Option<String>,
    pub action: Option<String>,
    pub overrides: Vec<(String, OptionValue)>,
}

impl ConfigureRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn output_area(mut self, dir: impl Into<NormalizedPath>) -> Self {
        self.output_area = Some(dir.into());
        self
    }

    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    pub fn config_file(self, path: impl Into<String>) -> Self {
        self.set(CONFIG_FILE, OptionValue::String(path.into()))
    }

    /// Explicit value for `key`, applied after defaults and file.
    ///
    /// A later call for the same key replaces the earlier one.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        let key = key.into();
        self.overrides.retain(|(k, _)| *k != key);
        self.overrides.push((key, value.into()));
        self
    }

    fn override_str(&self, key: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_str())
    }
}

/// Work done before any value is committed.
struct Prepared {
    identity: RunIdentity,
    registry: OptionRegistry,
    model: Option<String>,
    file: Option<(NormalizedPath, Snapshot)>,
}

/// Selections made before `configure`, restored if it fails.
struct Selections {
    model: Option<String>,
    pending_model: Option<OptionGroup>,
    actions: ActionSelector,
}

/// The live configuration of one run.
///
/// # Example
///
/// ```no_run
/// use pilot_core::{ConfigContext, ConfigureRequest};
///
/// let mut ctx = ConfigContext::default();
/// ctx.configure(
///     ConfigureRequest::new()
///         .model("vae")
///         .action("train")
///         .set("learning_rate", 1e-3),
/// )?;
/// ctx.check_readiness()?;
/// let lr: f64 = ctx.get_as("learning_rate")?;
/// ctx.freeze(true)?;
/// # Ok::<(), pilot_core::Error>(())
/// ```
pub struct ConfigContext {
    options: ContextOptions,
    state: ConfigurationState,
    registry: OptionRegistry,
    values: BTreeMap<String, OptionValue>,
    provenance: BTreeMap<String, Provenance>,
    extras: BTreeMap<String, OptionValue>,
    model: Option<String>,
    pending_model: Option<OptionGroup>,
    actions: ActionSelector,
    identity: Option<RunIdentity>,
    normalizer: Option<PathNormalizer>,
    sink: Option<Box<dyn LogSink>>,
}

impl Default for ConfigContext {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}

impl fmt::Debug for ConfigContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigContext")
            .field("state", &self.state)
            .field("model", &self.model)
            .field("action", &self.actions.current())
            .field("identity", &self.identity)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl ConfigContext {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            options,
            state: ConfigurationState::Unconfigured,
            registry: OptionRegistry::new(),
            values: BTreeMap::new(),
            provenance: BTreeMap::new(),
            extras: BTreeMap::new(),
            model: None,
            pending_model: None,
            actions: ActionSelector::new(),
            identity: None,
            normalizer: None,
            sink: None,
        }
    }

    // ------------------------------------------------------------------
    // Configure
    // ------------------------------------------------------------------

    /// Configure the run.
    ///
    /// Everything that can fail without touching values runs first: the run
    /// identity, the output area, the log sink, the working area, group
    /// validation, model resolution and reading the configuration file. A
    /// failure there leaves the context unconfigured. Errors raised while
    /// values are committed also roll the context back.
    pub fn configure(&mut self, request: ConfigureRequest) -> Result<()> {
        if self.state != ConfigurationState::Unconfigured {
            return self.logged(Err(LifecycleError::AlreadyConfigured.into()));
        }

        let started = Local::now();
        let run_number = identity::run_number(request.override_str(RUN_NUMBER), started);
        let experiment_name = request
            .override_str(EXPERIMENT_NAME)
            .map(str::to_string)
            .or_else(|| {
                self.options
                    .default_of(EXPERIMENT_NAME)
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| PROJECT_NAME.to_string());
        let output_area = match &request.output_area {
            Some(dir) => dir.clone(),
            None => identity::default_output_area(
                &self.options.runs_root,
                &experiment_name,
                request.model_name.as_deref(),
                &run_number,
            ),
        };

        // Sink acquisition: failures here have nowhere to be logged.
        let created = !output_area.exists();
        io::ensure_dir(&output_area)?;
        let sink = match (self.options.sink_factory)(&output_area, request.verbosity) {
            Ok(sink) => sink,
            Err(e) => {
                Self::discard_output_area(&output_area, created);
                return Err(e);
            }
        };

        let prepared = self.prepare(&request, experiment_name, run_number, output_area.clone());
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                sink.error(&e.to_string());
                drop(sink);
                Self::discard_output_area(&output_area, created);
                return Err(e);
            }
        };

        self.sink = Some(sink);
        let saved = Selections {
            model: self.model.clone(),
            pending_model: self.pending_model.clone(),
            actions: self.actions.clone(),
        };
        let result = self.commit(prepared, request);
        if result.is_err() {
            let result = self.logged(result);
            self.rollback(saved);
            return result;
        }
        result
    }

    fn prepare(
        &self,
        request: &ConfigureRequest,
        experiment_name: String,
        run_number: String,
        output_area: NormalizedPath,
    ) -> Result<Prepared> {
        let working_area = self.options.working_area.resolve(&self.options.start_dir)?;

        let mut registry = OptionRegistry::new();
        for group in &self.options.groups {
            registry.register(group.clone())?;
        }
        if let Some(group) = &self.pending_model {
            Self::register_model_group(&mut registry, group.clone())?;
        }

        let file = match self.config_file_path(request) {
            Some(path) => {
                let snapshot = Snapshot::load(&path)?;
                Some((path, snapshot))
            }
            None => None,
        };

        // An explicit model wins over the one recorded in the file.
        let file_model = file.as_ref().and_then(|(_, s)| s.model_name.clone());
        let model = match (&request.model_name, &self.model) {
            (Some(name), _) => Some(name.clone()),
            (None, None) => file_model,
            (None, Some(_)) => None,
        };
        if let Some(name) = &model {
            let group = self.select_model(name)?;
            Self::register_model_group(&mut registry, group)?;
        }

        Ok(Prepared {
            identity: RunIdentity {
                experiment_name,
                run_number,
                output_area,
                working_area,
            },
            registry,
            model,
            file,
        })
    }

    /// Remove an output area created by a configure that failed, unless
    /// something (such as a run log) was written into it.
    fn discard_output_area(output_area: &NormalizedPath, created: bool) {
        if created && !matches!(io::remove_empty_dir(output_area), Ok(true)) {
            tracing::debug!(path = %output_area, "Kept output area of failed configure");
        }
    }

    fn config_file_path(&self, request: &ConfigureRequest) -> Option<NormalizedPath> {
        request
            .override_str(CONFIG_FILE)
            .or_else(|| {
                self.options
                    .default_of(CONFIG_FILE)
                    .and_then(|v| v.as_str())
            })
            .filter(|p| !p.is_empty())
            .map(NormalizedPath::new)
    }

    fn commit(&mut self, prepared: Prepared, request: ConfigureRequest) -> Result<()> {
        let Prepared {
            identity,
            registry,
            model,
            file,
        } = prepared;

        self.state = ConfigurationState::Configuring;
        self.normalizer = Some(PathNormalizer::new(identity.working_area.clone()));
        self.registry = registry;
        if let Some(name) = model {
            self.model = Some(name);
        }
        self.pending_model = None;
        let run_number = identity.run_number.clone();

        self.info("Initialized a new config.");
        self.debug(&format!("-> Working area is: {}", identity.working_area));
        self.debug(&format!("-> Output area is: {}", identity.output_area));
        self.identity = Some(identity);

        self.debug("-> Loading all default options with their values.");
        let defaults: Vec<OptionDescriptor> = self.registry.iter().cloned().collect();
        for descriptor in defaults {
            let default = descriptor.default.clone().unwrap_or(OptionValue::Null);
            self.write(&descriptor.name, default, Provenance::Default)?;
        }
        self.rigidify_inner()?;

        match file {
            Some((path, snapshot)) => {
                self.debug(&format!("-> Loading options from file: '{path}'."));
                self.apply_file(snapshot)?;
            }
            None => self.debug("-> No extra config file given. Leaving default values."),
        }

        self.debug("-> Applying explicit overrides.");
        let mut overrides = request.overrides;
        overrides.retain(|(k, _)| k != RUN_NUMBER);
        overrides.push((RUN_NUMBER.to_string(), OptionValue::String(run_number)));
        for (key, value) in overrides {
            self.write(&key, value, Provenance::Cli)?;
        }

        if let Some(action) = &request.action {
            self.set_action_inner(action, false)?;
        }
        Ok(())
    }

    fn apply_file(&mut self, snapshot: Snapshot) -> Result<()> {
        for (key, value) in snapshot.values {
            let Some(descriptor) = self.registry.get(&key) else {
                return Err(LifecycleError::UnknownOption { key }.into());
            };
            if descriptor.is_recomputed_per_run() {
                continue;
            }
            if self.values.get(&key) == Some(&value) {
                self.provenance.insert(key, Provenance::File);
            } else {
                self.write(&key, value, Provenance::File)?;
            }
        }
        Ok(())
    }

    fn rollback(&mut self, saved: Selections) {
        self.state = ConfigurationState::Unconfigured;
        self.registry = OptionRegistry::new();
        self.values.clear();
        self.provenance.clear();
        self.extras.clear();
        self.identity = None;
        self.normalizer = None;
        self.sink = None;
        self.model = saved.model;
        self.pending_model = saved.pending_model;
        self.actions = saved.actions;
    }

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    /// Select the model of this run and merge its option group.
    pub fn set_model_name(&mut self, name: &str) -> Result<()> {
        let result = self.set_model_name_inner(name);
        self.logged(result)
    }

    fn set_model_name_inner(&mut self, name: &str) -> Result<()> {
        let group = self.select_model(name)?;

        match self.state {
            ConfigurationState::Unconfigured => {
                self.model = Some(name.to_string());
                self.pending_model = Some(group);
                return Ok(());
            }
            ConfigurationState::Frozen => {
                return Err(LifecycleError::Frozen {
                    key: pilot_meta::constants::MODEL_NAME_KEY.to_string(),
                }
                .into());
            }
            ConfigurationState::Configuring | ConfigurationState::Rigid => {}
        }

        // Defaults are checked and placed before the registry, model or
        // state change, so a bad default leaves the context as it was.
        let mut defaults = Vec::with_capacity(group.len());
        for descriptor in group.iter() {
            let default = descriptor.default.clone().unwrap_or(OptionValue::Null);
            descriptor.check(&default)?;
            defaults.push((descriptor.name.clone(), self.place(descriptor, default)?));
        }

        let injected = Self::register_model_group(&mut self.registry, group)?;
        self.model = Some(name.to_string());
        if !injected {
            return Ok(());
        }

        let was_rigid = self.state == ConfigurationState::Rigid;
        if was_rigid {
            self.unrigidify_inner()?;
        }
        for (key, value) in defaults {
            self.store(&key, value, Provenance::Default);
        }
        if was_rigid {
            self.rigidify_inner()?;
        }
        Ok(())
    }

    /// Check a model selection without recording it.
    fn select_model(&self, name: &str) -> Result<OptionGroup> {
        if let Some(current) = &self.model {
            return Err(SelectionError::ModelAlreadySet {
                current: current.clone(),
                requested: name.to_string(),
            }
            .into());
        }
        if !self.options.allowed_models.iter().any(|m| m == name) {
            return Err(SelectionError::InvalidModel {
                name: name.to_string(),
                allowed: self.options.allowed_models.clone(),
            }
            .into());
        }
        let group = self.options.models.resolve(name)?;
        OptionRegistry::validate(&group)?;
        Ok(group)
    }

    /// Register a model group unless one for the same model is present.
    fn register_model_group(registry: &mut OptionRegistry, group: OptionGroup) -> Result<bool> {
        if registry.has_scope(group.scope()) {
            return Ok(false);
        }
        registry.register(group)?;
        Ok(true)
    }

    /// Record the action of this run.
    pub fn set_action(&mut self, name: &str, allow_override: bool) -> Result<Action> {
        let result = self.set_action_inner(name, allow_override);
        self.logged(result)
    }

    fn set_action_inner(&mut self, name: &str, allow_override: bool) -> Result<Action> {
        let action = self.actions.select(name, allow_override)?;
        self.debug(&format!("-> Action is: {action}"));
        Ok(action)
    }

    /// Succeeds once the run is configured with an action and a model.
    pub fn check_readiness(&self) -> Result<()> {
        let result = self.readiness();
        self.logged(result)
    }

    fn readiness(&self) -> Result<()> {
        if self.state == ConfigurationState::Unconfigured {
            return Err(LifecycleError::NotConfigured.into());
        }
        if !self.actions.is_set() {
            return Err(ReadinessError::ActionMissing.into());
        }
        let Some(model) = &self.model else {
            return Err(ReadinessError::ModelMissing.into());
        };
        match self.registry.scope_len(&GroupScope::Model(model.clone())) {
            Some(n) if n > 0 => Ok(()),
            _ => Err(ReadinessError::ModelOptionsMissing.into()),
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Set an option explicitly.
    pub fn set(&mut self, key: &str, value: impl Into<OptionValue>) -> Result<()> {
        let result = self.write(key, value.into(), Provenance::Cli);
        self.logged(result)
    }

    fn write(&mut self, key: &str, value: OptionValue, provenance: Provenance) -> Result<()> {
        match self.state {
            ConfigurationState::Unconfigured => {
                return Err(LifecycleError::NotConfigured.into());
            }
            ConfigurationState::Frozen => {
                return Err(LifecycleError::Frozen {
                    key: key.to_string(),
                }
                .into());
            }
            ConfigurationState::Configuring | ConfigurationState::Rigid => {}
        }

        let Some(descriptor) = self.registry.get(key).cloned() else {
            if self.state == ConfigurationState::Rigid && !self.extras.contains_key(key) {
                return Err(LifecycleError::UnknownOptionInRigidState {
                    key: key.to_string(),
                }
                .into());
            }
            self.debug(&format!("--> (AD HOC) '{key}': {value}"));
            self.extras.insert(key.to_string(), value);
            return Ok(());
        };

        descriptor.check(&value)?;
        let value = self.place(&descriptor, value)?;
        self.store(key, value, provenance);
        Ok(())
    }

    fn store(&mut self, key: &str, value: OptionValue, provenance: Provenance) {
        self.debug(&format!("--> ({}) '{key}': {value}", provenance.tag()));
        self.values.insert(key.to_string(), value);
        self.provenance.insert(key.to_string(), provenance);
    }

    /// Anchor output-relative and path values.
    fn place(&self, descriptor: &OptionDescriptor, value: OptionValue) -> Result<OptionValue> {
        if descriptor.is_output_relative {
            if let (OptionValue::String(name), Some(identity)) = (&value, &self.identity) {
                if !name.is_empty() {
                    let joined = identity.output_area.join(name.as_str());
                    return Ok(OptionValue::String(joined.as_str().to_string()));
                }
            }
            return Ok(value);
        }
        if !descriptor.is_path {
            return Ok(value);
        }
        let Some(normalizer) = &self.normalizer else {
            return Ok(value);
        };
        let relative = |path: &str| {
            normalizer
                .to_relative(&descriptor.name, path, descriptor.allow_missing)
                .map(OptionValue::String)
        };
        match &value {
            OptionValue::String(path) => Ok(relative(path)?),
            OptionValue::Array(items) => {
                let paths = items
                    .iter()
                    .map(|item| relative(item.as_str().unwrap_or_default()))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(OptionValue::Array(paths))
            }
            _ => Ok(value),
        }
    }

    /// Live value of a registered option or an ad hoc entry.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key).or_else(|| self.extras.get(key))
    }

    /// Live value deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key).ok_or_else(|| LifecycleError::UnknownOption {
            key: key.to_string(),
        })?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn provenance(&self, key: &str) -> Option<Provenance> {
        self.provenance.get(key).copied()
    }

    /// Live values of every registered option.
    pub fn values(&self) -> &BTreeMap<String, OptionValue> {
        &self.values
    }

    /// Absolute form of a path option's value, one entry per path.
    pub fn absolute_paths(&self, key: &str) -> Result<Vec<NormalizedPath>> {
        let Some(normalizer) = &self.normalizer else {
            return self.logged(Err(LifecycleError::NotConfigured.into()));
        };
        let paths = match self.get(key) {
            None => {
                return self.logged(Err(LifecycleError::UnknownOption {
                    key: key.to_string(),
                }
                .into()));
            }
            Some(OptionValue::String(path)) => vec![path.as_str()],
            Some(OptionValue::Array(items)) => items.iter().filter_map(|i| i.as_str()).collect(),
            Some(_) => Vec::new(),
        };
        Ok(normalizer.to_absolute_all(paths))
    }

    pub fn identity(&self) -> Option<&RunIdentity> {
        self.identity.as_ref()
    }

    pub fn state(&self) -> ConfigurationState {
        self.state
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn action(&self) -> Option<Action> {
        self.actions.current()
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Snapshot of the live values and the selected model.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.values.clone(), self.model.clone())
    }

    // ------------------------------------------------------------------
    // State flips
    // ------------------------------------------------------------------

    /// Freeze the configuration, writing the snapshot when `dump` is set.
    ///
    /// Returns the snapshot path, or `None` if nothing was written. Calling
    /// it on a frozen context does nothing.
    pub fn freeze(&mut self, dump: bool) -> Result<Option<NormalizedPath>> {
        let result = self.freeze_inner(dump);
        self.logged(result)
    }

    fn freeze_inner(&mut self, dump: bool) -> Result<Option<NormalizedPath>> {
        match self.state {
            ConfigurationState::Frozen => return Ok(None),
            ConfigurationState::Rigid => {}
            from => return Err(self.invalid_transition(from, ConfigurationState::Frozen)),
        }

        let mut written = None;
        if dump {
            let Some(identity) = &self.identity else {
                return Err(LifecycleError::NotConfigured.into());
            };
            let path = identity.output_area.join(self.options.snapshot_name.as_str());
            self.debug("--> Dumping options to file.");
            let receipt = self.snapshot().write(&path)?;
            self.info(&format!(
                "-> Config dumped to '{}' ({})",
                receipt.path, receipt.checksum
            ));
            written = Some(receipt.path);
        }

        self.state = ConfigurationState::Frozen;
        self.debug("-> Freezing options. No additional changes possible.");
        Ok(written)
    }

    /// Reopen a frozen configuration. Meant for tests.
    pub fn unfreeze(&mut self) -> Result<()> {
        let result = self.flip(ConfigurationState::Frozen, ConfigurationState::Rigid);
        if result.is_ok() {
            self.debug("-> Unfreezing options. Additional changes possible.");
        }
        self.logged(result)
    }

    /// Stop accepting new keys.
    pub fn rigidify(&mut self) -> Result<()> {
        let result = self.rigidify_inner();
        self.logged(result)
    }

    fn rigidify_inner(&mut self) -> Result<()> {
        self.flip(ConfigurationState::Configuring, ConfigurationState::Rigid)?;
        self.debug("-> Making the options rigid. No additional members possible.");
        Ok(())
    }

    /// Accept new keys again.
    pub fn unrigidify(&mut self) -> Result<()> {
        let result = self.unrigidify_inner();
        self.logged(result)
    }

    fn unrigidify_inner(&mut self) -> Result<()> {
        self.flip(ConfigurationState::Rigid, ConfigurationState::Configuring)?;
        self.debug("-> Making the options flexible. Additional members possible.");
        Ok(())
    }

    fn flip(&mut self, from: ConfigurationState, to: ConfigurationState) -> Result<()> {
        if self.state != from {
            return Err(self.invalid_transition(self.state, to));
        }
        self.state = to;
        Ok(())
    }

    fn invalid_transition(&self, from: ConfigurationState, to: ConfigurationState) -> Error {
        if from == ConfigurationState::Unconfigured {
            return LifecycleError::NotConfigured.into();
        }
        LifecycleError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
        .into()
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    fn logged<T>(&self, result: Result<T>) -> Result<T> {
        if let (Err(e), Some(sink)) = (&result, &self.sink) {
            sink.error(&e.to_string());
        }
        result
    }

    fn info(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink.info(message);
        }
    }

    fn debug(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink.debug(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_context_is_unconfigured() {
        let ctx = ConfigContext::default();
        assert_eq!(ctx.state(), ConfigurationState::Unconfigured);
        assert!(ctx.values().is_empty());
        assert!(ctx.identity().is_none());
    }

    #[test]
    fn set_before_configure_fails() {
        let mut ctx = ConfigContext::default();
        let err = ctx.set("learning_rate", 1e-3).unwrap_err();
        assert!(matches!(
            err,
            Error::Lifecycle(LifecycleError::NotConfigured)
        ));
    }

    #[test]
    fn flips_before_configure_report_not_configured() {
        let mut ctx = ConfigContext::default();
        assert!(matches!(
            ctx.rigidify(),
            Err(Error::Lifecycle(LifecycleError::NotConfigured))
        ));
        assert!(matches!(
            ctx.freeze(true),
            Err(Error::Lifecycle(LifecycleError::NotConfigured))
        ));
    }

    #[test]
    fn model_can_be_chosen_before_configure() {
        let sink = MemorySink::new();
        let mut ctx = ConfigContext::new(ContextOptions::new().with_sink_factory(sink.factory()));

        ctx.set_model_name("vae").unwrap();

        assert_eq!(ctx.model_name(), Some("vae"));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn request_overrides_replace_earlier_ones() {
        let request = ConfigureRequest::new()
            .set("epochs", 2)
            .set("epochs", 5)
            .config_file("runs/old/config.yaml");

        assert_eq!(
            request.overrides,
            vec![
                ("epochs".to_string(), OptionValue::from(5)),
                (
                    CONFIG_FILE.to_string(),
                    OptionValue::from("runs/old/config.yaml")
                ),
            ]
        );
    }
}
