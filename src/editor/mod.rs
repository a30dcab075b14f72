//! Editor controller
//!
//! [`TemplateEditor`] owns the application state (current template, current
//! variable values and the rendered output), the field store and the form.
//! Every public action publishes an [`Event`] and then handles the event
//! queue, so the state is up to date when the call returns.

mod collaborators;

pub use collaborators::{
    Clipboard, FileSaver, Notification, NotificationKind, Notifier, Preview, SaveError,
};

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::events::{Event, EventBus, SubscriptionId};
use crate::form::{FieldEdit, TemplateForm};
use crate::parser::variable_names;
use crate::renderer::{render, Export};
use crate::store::{Backend, Field, FieldStore, MemoryBackend, TEMPLATE_KEY};

/// Messages shown to the user
pub mod messages {
    pub const COPIED: &str = "HTML copied to clipboard!";
    pub const COPY_FAILED: &str = "Failed to copy HTML.";
    pub const DOWNLOADING: &str = "Downloading HTML.";
    pub const SAVE_FAILED: &str = "Failed to save file.";
}

/// Current template, values and rendered output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub template: String,
    pub variables: HashMap<String, String>,
    pub rendered: String,
}

impl AppState {
    /// Recompute the rendered output from the template and values
    pub fn rerender(&mut self) -> &str {
        self.rendered = render(&self.template, &self.variables);
        &self.rendered
    }
}

/// Controller wiring the template, the form and the output together
pub struct TemplateEditor<B: Backend = MemoryBackend> {
    store: FieldStore<B>,
    form: TemplateForm,
    state: AppState,
    bus: EventBus,
    config: EditorConfig,
    export: Export,
    preview: Option<Box<dyn Preview>>,
    clipboard: Option<Box<dyn Clipboard>>,
    saver: Option<Box<dyn FileSaver>>,
    notifier: Option<Box<dyn Notifier>>,
}

impl<B: Backend> TemplateEditor<B> {
    /// Create an editor over a store. Call [`TemplateEditor::start`] next.
    pub fn new(store: FieldStore<B>, config: EditorConfig) -> Self {
        let form = TemplateForm::with_defaults(config.default_fields.clone());
        let export = Export::new().with_file_name(config.export_file_name.clone());
        Self {
            store,
            form,
            state: AppState::default(),
            bus: EventBus::new(),
            config,
            export,
            preview: None,
            clipboard: None,
            saver: None,
            notifier: None,
        }
    }

    pub fn with_preview(mut self, preview: impl Preview + 'static) -> Self {
        self.preview = Some(Box::new(preview));
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn with_file_saver(mut self, saver: impl FileSaver + 'static) -> Self {
        self.saver = Some(Box::new(saver));
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn rendered(&self) -> &str {
        &self.state.rendered
    }

    pub fn form(&self) -> &TemplateForm {
        &self.form
    }

    pub fn store(&self) -> &FieldStore<B> {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Observe every event published by the editor
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.bus.subscribe(handler)
    }

    /// Load the stored template and fields and render once
    pub fn start(&mut self) -> Result<(), EditorError> {
        let template = match self.store.get(TEMPLATE_KEY) {
            Ok(template) => template,
            Err(e) => {
                if !e.is_missing() {
                    warn!(error = %e, "could not read stored template, using default");
                }
                self.config.default_template.clone()
            }
        };

        self.form.load(&self.store)?;
        self.bus
            .publish(Event::VariablesChanged(self.form.variables()));
        self.set_template(template)?;
        info!(
            fields = self.form.fields().len(),
            variables = self.form.template_variables().len(),
            "editor started"
        );
        Ok(())
    }

    /// Replace the template text and persist it
    pub fn set_template(&mut self, template: impl Into<String>) -> Result<(), EditorError> {
        let template = template.into();
        self.store.put(TEMPLATE_KEY, template.clone())?;
        let variables = variable_names(&template);
        self.bus.publish(Event::TemplateChanged {
            template,
            variables,
        });
        self.process_events()
    }

    /// Type a value into the input bound to `variable`
    pub fn set_input_value(
        &mut self,
        variable: &str,
        value: impl Into<String>,
    ) -> Result<bool, EditorError> {
        let updated = self.form.set_input_value(&self.store, variable, value)?;
        if updated {
            self.bus
                .publish(Event::VariablesChanged(self.form.variables()));
            self.process_events()?;
        }
        Ok(updated)
    }

    /// Append a new field
    pub fn add_field(&mut self) -> Result<(), EditorError> {
        self.form.add_field(&self.store)?;
        self.fields_changed()
    }

    /// Remove the field at `index`
    pub fn remove_field(&mut self, index: usize) -> Result<Field, EditorError> {
        let removed = self.form.remove_field(&self.store, index)?;
        self.fields_changed()?;
        Ok(removed)
    }

    /// Reorder a field
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.form.move_field(&self.store, from, to)?;
        self.fields_changed()
    }

    /// Edit one property of the field at `index`
    pub fn edit_field(&mut self, index: usize, edit: FieldEdit) -> Result<(), EditorError> {
        self.form.edit_field(&self.store, index, edit)?;
        self.fields_changed()
    }

    /// Apply several edits to the field at `index` as a single undo step
    pub fn edit_field_with(
        &mut self,
        index: usize,
        edits: impl IntoIterator<Item = FieldEdit>,
    ) -> Result<(), EditorError> {
        self.form.edit_field_with(&self.store, index, edits)?;
        self.fields_changed()
    }

    /// Empty every input value
    pub fn clear_form(&mut self) -> Result<(), EditorError> {
        self.form.clear_values(&self.store)?;
        self.fields_changed()
    }

    /// Restore the previous field list. Returns `None` when there is no history.
    pub fn undo(&mut self) -> Result<Option<Vec<Field>>, EditorError> {
        let restored = self.store.undo()?;
        if restored.is_some() {
            self.fields_changed()?;
        }
        Ok(restored)
    }

    /// Copy the rendered output
    pub fn request_copy(&mut self) -> Result<(), EditorError> {
        self.bus.publish(Event::CopyRequested);
        self.process_events()
    }

    /// Download the rendered output
    pub fn request_download(&mut self) -> Result<(), EditorError> {
        self.bus.publish(Event::DownloadRequested);
        self.process_events()
    }

    /// Handle every queued event, including ones raised while handling
    pub fn process_events(&mut self) -> Result<(), EditorError> {
        while let Some(event) = self.bus.take_next() {
            debug!(event = %event, "handling event");
            self.handle(event)?;
        }
        Ok(())
    }

    fn fields_changed(&mut self) -> Result<(), EditorError> {
        self.bus.publish(Event::FieldsChanged);
        self.process_events()
    }

    fn handle(&mut self, event: Event) -> Result<(), EditorError> {
        match event {
            Event::TemplateChanged {
                template,
                variables,
            } => {
                self.state.template = template;
                self.form.highlight(&variables);
                self.refresh_preview();
            }
            Event::VariablesChanged(variables) => {
                self.state.variables = variables;
                self.refresh_preview();
            }
            Event::FieldsChanged => {
                self.form.load(&self.store)?;
                self.bus
                    .publish(Event::VariablesChanged(self.form.variables()));
            }
            Event::CopyRequested => self.copy(),
            Event::DownloadRequested => self.download(),
        }
        Ok(())
    }

    fn refresh_preview(&mut self) {
        self.state.rerender();
        if let Some(preview) = self.preview.as_mut() {
            preview.update(&self.state.rendered);
        }
    }

    fn copy(&mut self) {
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.write_text(&self.state.rendered),
            None => Err("no clipboard available".to_string()),
        };
        match result {
            Ok(()) => self.notify(Notification::success(
                messages::COPIED,
                self.config.notification_duration(),
            )),
            Err(e) => {
                warn!(error = %e, "failed to copy");
                self.notify(Notification::error(
                    messages::COPY_FAILED,
                    self.config.notification_duration(),
                ));
            }
        }
    }

    fn download(&mut self) {
        let result = match self.saver.as_mut() {
            Some(saver) => saver.save(&self.export, &self.state.rendered),
            None => Err(SaveError::Failed("no file saver available".to_string())),
        };
        match result {
            Ok(()) => self.notify(Notification::success(
                messages::DOWNLOADING,
                self.config.notification_duration(),
            )),
            Err(SaveError::Cancelled) => debug!("save cancelled"),
            Err(SaveError::Failed(e)) => {
                warn!(error = %e, file = %self.export.file_name, "failed to save file");
                self.notify(Notification::error(
                    messages::SAVE_FAILED,
                    self.config.notification_duration(),
                ));
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.show(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Recorder {
        previews: Arc<Mutex<Vec<String>>>,
        notes: Arc<Mutex<Vec<Notification>>>,
        saved: Arc<Mutex<Vec<(String, String)>>>,
        copied: Arc<Mutex<Vec<String>>>,
    }

    impl Clipboard for Recorder {
        fn write_text(&mut self, text: &str) -> Result<(), String> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    impl Preview for Recorder {
        fn update(&mut self, html: &str) {
            self.previews.lock().unwrap().push(html.to_string());
        }
    }

    impl Notifier for Recorder {
        fn show(&mut self, notification: Notification) {
            self.notes.lock().unwrap().push(notification);
        }
    }

    struct Saver(Recorder, Result<(), SaveError>);

    impl FileSaver for Saver {
        fn save(&mut self, export: &Export, contents: &str) -> Result<(), SaveError> {
            self.0
                .saved
                .lock()
                .unwrap()
                .push((export.file_name.clone(), contents.to_string()));
            self.1.clone()
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), String> {
            Err("permission denied".to_string())
        }
    }

    fn editor(template: &str, recorder: &Recorder) -> TemplateEditor {
        let config = EditorConfig::new().with_default_template(template);
        let mut editor = TemplateEditor::new(FieldStore::in_memory(), config)
            .with_preview(recorder.clone())
            .with_notifier(recorder.clone());
        editor.start().unwrap();
        editor
    }

    #[test]
    fn test_start_renders_defaults() {
        let recorder = Recorder::default();
        let editor = editor("Hello {NAME[0]}: {MESSAGE}", &recorder);
        assert_eq!(
            editor.rendered(),
            "Hello George: All your base are belong to..."
        );
        assert_eq!(
            recorder.previews.lock().unwrap().last().unwrap(),
            editor.rendered()
        );
        assert_eq!(
            editor.store().get(TEMPLATE_KEY).unwrap(),
            "Hello {NAME[0]}: {MESSAGE}"
        );
        assert_eq!(editor.form().missing(), vec!["OWNER"]);
    }

    #[test]
    fn test_input_updates_preview() {
        let recorder = Recorder::default();
        let mut editor = editor("by {OWNER}", &recorder);
        assert_eq!(editor.rendered(), "by ");
        assert!(editor.set_input_value("OWNER", "us").unwrap());
        assert_eq!(editor.rendered(), "by us");
        assert!(!editor.set_input_value("UNKNOWN", "x").unwrap());
    }

    #[test]
    fn test_template_change_rehighlights() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}", &recorder);
        editor.set_template("{OWNER} {UNBOUND}").unwrap();
        assert_eq!(editor.form().missing(), vec!["NAME", "MESSAGE"]);
        assert_eq!(editor.rendered(), " {UNBOUND}");
    }

    #[test]
    fn test_field_edits_and_undo() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}|{NEW_VARIABLE}", &recorder);
        editor.add_field().unwrap();
        editor
            .edit_field(3, FieldEdit::Value("fresh".into()))
            .unwrap();
        assert_eq!(editor.rendered(), "George Costanza|fresh");

        editor.undo().unwrap().unwrap();
        assert_eq!(editor.rendered(), "George Costanza|");
        editor.undo().unwrap().unwrap();
        assert_eq!(editor.rendered(), "George Costanza|{NEW_VARIABLE}");
    }

    #[test]
    fn test_multi_property_edit_is_one_undo_step() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}/{FULL}", &recorder);
        editor
            .edit_field_with(
                0,
                [
                    FieldEdit::Label("Full".into()),
                    FieldEdit::BindToVariable("FULL".into()),
                ],
            )
            .unwrap();
        assert_eq!(editor.rendered(), "{NAME}/George Costanza");

        editor.undo().unwrap().unwrap();
        assert_eq!(editor.form().fields()[0].label, "Name");
        assert_eq!(editor.form().fields()[0].bind_to_variable, "NAME");
        assert_eq!(editor.rendered(), "George Costanza/{FULL}");
    }

    #[test]
    fn test_set_input_value_not_applied_when_store_rejects() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}", &recorder);
        editor
            .store()
            .save_layout(vec![Field::new("Title", "TITLE")])
            .unwrap();
        assert!(!editor.set_input_value("NAME", "x").unwrap());
        assert_eq!(editor.rendered(), "George Costanza");
    }

    #[test]
    fn test_undo_to_empty_snapshot_restores_defaults() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}", &recorder);
        assert_eq!(editor.undo().unwrap(), Some(vec![]));
        assert_eq!(editor.form().fields(), crate::form::default_fields().as_slice());
        assert_eq!(editor.store().get_all().unwrap(), editor.form().fields());
        assert_eq!(editor.rendered(), "George Costanza");
    }

    #[test]
    fn test_clear_form() {
        let recorder = Recorder::default();
        let mut editor = editor("[{NAME}]", &recorder);
        editor.clear_form().unwrap();
        assert_eq!(editor.rendered(), "[]");
    }

    #[test]
    fn test_copy_without_clipboard_fails() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}", &recorder);
        editor.request_copy().unwrap();
        let notes = recorder.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, messages::COPY_FAILED);
    }

    #[test]
    fn test_copy_success_and_failure() {
        let recorder = Recorder::default();
        let mut editor = editor("{NAME}", &recorder).with_clipboard(recorder.clone());
        editor.request_copy().unwrap();
        assert_eq!(*recorder.copied.lock().unwrap(), vec!["George Costanza"]);

        let mut denied = editor.with_clipboard(DeniedClipboard);
        denied.request_copy().unwrap();

        let notes = recorder.notes.lock().unwrap();
        let shown: Vec<_> = notes.iter().map(|n| (n.message.as_str(), n.kind)).collect();
        assert_eq!(
            shown,
            vec![
                (messages::COPIED, NotificationKind::Success),
                (messages::COPY_FAILED, NotificationKind::Error)
            ]
        );
        assert_eq!(notes[0].duration, Duration::from_millis(3000));
    }

    #[test]
    fn test_download_writes_rendered_html() {
        let recorder = Recorder::default();
        let mut editor = editor("<p>{NAME[1]}</p>", &recorder)
            .with_file_saver(Saver(recorder.clone(), Ok(())));
        editor.request_download().unwrap();

        let saved = recorder.saved.lock().unwrap();
        assert_eq!(
            *saved,
            vec![("template.html".to_string(), "<p>Costanza</p>".to_string())]
        );
        let notes = recorder.notes.lock().unwrap();
        assert_eq!(notes[0].message, messages::DOWNLOADING);
        assert_eq!(notes[0].kind, NotificationKind::Success);
    }

    #[test]
    fn test_cancelled_download_is_silent() {
        let recorder = Recorder::default();
        let mut editor = editor("x", &recorder)
            .with_file_saver(Saver(recorder.clone(), Err(SaveError::Cancelled)));
        editor.request_download().unwrap();
        assert!(recorder.notes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_download_notifies() {
        let recorder = Recorder::default();
        let mut editor = editor("x", &recorder).with_file_saver(Saver(
            recorder.clone(),
            Err(SaveError::Failed("disk full".into())),
        ));
        editor.request_download().unwrap();
        let notes = recorder.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, messages::SAVE_FAILED);
    }

    #[test]
    fn test_subscribers_observe_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut editor = TemplateEditor::new(FieldStore::in_memory(), EditorConfig::new());
        editor.subscribe(move |e| sink.lock().unwrap().push(e.name()));
        editor.start().unwrap();
        editor.add_field().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "variables-changed",
                "template-changed",
                "fields-changed",
                "variables-changed"
            ]
        );
    }

    #[test]
    fn test_stored_template_wins_over_default() {
        let store = FieldStore::in_memory();
        store.put(TEMPLATE_KEY, "stored {NAME}").unwrap();
        let mut editor = TemplateEditor::new(store, EditorConfig::new());
        editor.start().unwrap();
        assert_eq!(editor.state().template, "stored {NAME}");
        assert_eq!(editor.rendered(), "stored George Costanza");
    }
}
