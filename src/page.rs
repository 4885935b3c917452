//! Module management page
//!
//! Ties the controller, the form and the table together for the terminal. A
//! one-shot command mounts the page, performs its action and renders the result;
//! `interactive` keeps a single page mounted and loops over a menu.

use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use validator::Validate;

use crate::controller::{ModuleController, Operation, PageView};
use crate::error::{MlmodError, Result};
use crate::form::{into_validation_error, FormInput, FormMode, ModuleForm};
use crate::gateway::ModuleGateway;
use crate::list::{ListEvent, ModuleList};
use crate::ui::UI;

/// Entry of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Create,
    SaveEdit,
    Edit,
    CancelEdit,
    Delete,
    Quit,
}

impl MenuAction {
    /// Actions that make sense for the current page state, in menu order
    pub fn available(editing: bool, has_modules: bool) -> Vec<MenuAction> {
        let mut actions = vec![if editing {
            MenuAction::SaveEdit
        } else {
            MenuAction::Create
        }];
        if has_modules {
            actions.push(MenuAction::Edit);
        }
        if editing {
            actions.push(MenuAction::CancelEdit);
        }
        if has_modules {
            actions.push(MenuAction::Delete);
        }
        actions.push(MenuAction::Quit);
        actions
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Create => "Create a module",
            MenuAction::SaveEdit => "Update the module being edited",
            MenuAction::Edit => "Edit a module",
            MenuAction::CancelEdit => "Cancel edit",
            MenuAction::Delete => "Delete a module",
            MenuAction::Quit => "Quit",
        }
    }
}

pub struct ModulePage<G> {
    controller: ModuleController<G>,
    ui: UI,
}

impl<G: ModuleGateway> ModulePage<G> {
    pub fn new(controller: ModuleController<G>) -> Self {
        Self {
            controller,
            ui: UI::new(),
        }
    }

    pub fn controller(&self) -> &ModuleController<G> {
        &self.controller
    }

    /// Mount the page. A failed initial load is returned as the page's error.
    pub async fn open(&mut self) -> Result<()> {
        self.controller.mount().await;
        match self.controller.view() {
            PageView::Failed(message) => Err(MlmodError::operation_failed(message)),
            _ => Ok(()),
        }
    }

    pub fn render(&self) {
        match self.controller.view() {
            PageView::Loading => self.ui.info("Loading modules..."),
            PageView::Failed(message) => self.ui.error(&format!("Error: {}", message)),
            PageView::Ready {
                modules,
                editing,
                error,
            } => {
                self.ui.header("Machine Learning Modules");
                if let Some(message) = error {
                    self.ui.error(&format!("Error: {}", message));
                }
                ModuleList::new(modules).render(&self.ui);
                if let Some(module) = editing {
                    self.ui.blank_line();
                    self.ui.info(&format!(
                        "Editing {} ({})",
                        module.display_name(),
                        module.id
                    ));
                }
            }
        }
    }

    /// Apply a row action from the table
    pub async fn handle_event(&mut self, event: ListEvent) -> bool {
        match event {
            ListEvent::Edit(module) => {
                self.controller.select_for_edit(module);
                true
            }
            ListEvent::Delete(id) => self.controller.delete(&id).await,
        }
    }

    /// `mlmod list`
    pub async fn list(&mut self) -> Result<()> {
        self.open().await?;
        self.render();
        Ok(())
    }

    /// `mlmod create`; prompts for every field when none was given
    pub async fn create(&mut self, input: FormInput) -> Result<()> {
        self.open().await?;
        self.controller.cancel_edit();

        let mut form = ModuleForm::new();
        self.fill(&mut form, input)?;
        self.submit_form(&form).await?;

        self.ui.success("Module created");
        self.render();
        Ok(())
    }

    /// `mlmod update`; fields not given keep the module's current values
    pub async fn update(&mut self, id: &str, input: FormInput) -> Result<()> {
        self.open().await?;

        let event = ModuleList::new(self.controller.modules().as_slice())
            .edit(id)
            .ok_or_else(|| MlmodError::module_not_found(id))?;
        self.handle_event(event).await;

        let mut form = self
            .controller
            .editing()
            .map(ModuleForm::from_module)
            .unwrap_or_default();
        self.fill(&mut form, input)?;
        self.submit_form(&form).await?;

        self.ui.success(&format!("Module {} updated", id));
        self.render();
        Ok(())
    }

    /// `mlmod delete`; asks for confirmation unless `force` is set
    pub async fn delete(&mut self, id: &str, force: bool) -> Result<()> {
        self.open().await?;

        let event = ModuleList::new(self.controller.modules().as_slice())
            .delete(id)
            .ok_or_else(|| MlmodError::module_not_found(id))?;

        if !force && !confirm_delete(&ColorfulTheme::default(), id)? {
            self.ui.warning("Deletion cancelled");
            return Ok(());
        }

        if !self.handle_event(event).await {
            return Err(self.last_error(Operation::Delete));
        }

        self.ui.success(&format!("Module {} deleted", id));
        self.render();
        Ok(())
    }

    /// Keep the page mounted and loop over the menu until the user quits
    pub async fn interactive(&mut self) -> Result<()> {
        self.open().await?;
        let theme = ColorfulTheme::default();

        loop {
            self.render();

            let actions = MenuAction::available(
                self.controller.editing().is_some(),
                !self.controller.modules().is_empty(),
            );
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            let choice = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(&labels)
                .default(0)
                .interact_opt()?;

            let action = match choice {
                Some(index) => actions[index],
                None => break,
            };

            match action {
                MenuAction::Quit => break,
                MenuAction::Create | MenuAction::SaveEdit => {
                    let mode = FormMode::for_editing(self.controller.editing());
                    let mut form = self
                        .controller
                        .editing()
                        .map(ModuleForm::from_module)
                        .unwrap_or_default();
                    form.prompt(&mode)?;

                    match form.submit() {
                        Ok(payload) => {
                            if self.controller.submit(payload).await {
                                self.ui.success("Module saved");
                            }
                        }
                        Err(errors) => {
                            for error in errors {
                                self.ui.warning(&error.to_string());
                            }
                        }
                    }
                }
                MenuAction::Edit => {
                    if let Some(index) = self.pick_row(&theme, "Edit which module?")? {
                        let event =
                            ModuleList::new(self.controller.modules().as_slice()).edit_at(index);
                        if let Some(event) = event {
                            self.handle_event(event).await;
                        }
                    }
                }
                MenuAction::CancelEdit => self.controller.cancel_edit(),
                MenuAction::Delete => {
                    if let Some(index) = self.pick_row(&theme, "Delete which module?")? {
                        let event =
                            ModuleList::new(self.controller.modules().as_slice()).delete_at(index);
                        if let Some(ListEvent::Delete(id)) = event {
                            if confirm_delete(&theme, &id)? {
                                self.handle_event(ListEvent::Delete(id)).await;
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn fill(&self, form: &mut ModuleForm, input: FormInput) -> Result<()> {
        if input.is_empty() {
            form.prompt(&FormMode::for_editing(self.controller.editing()))
        } else {
            form.apply(input);
            Ok(())
        }
    }

    async fn submit_form(&mut self, form: &ModuleForm) -> Result<()> {
        let payload = form
            .submit()
            .map_err(|errors| into_validation_error(&errors))?;
        payload.validate()?;

        let operation = if self.controller.editing().is_some() {
            Operation::Update
        } else {
            Operation::Create
        };

        if self.controller.submit(payload).await {
            Ok(())
        } else {
            Err(self.last_error(operation))
        }
    }

    fn pick_row(&self, theme: &ColorfulTheme, prompt: &str) -> Result<Option<usize>> {
        let choices = ModuleList::new(self.controller.modules().as_slice()).choices();
        let choice = Select::with_theme(theme)
            .with_prompt(prompt)
            .items(&choices)
            .interact_opt()?;
        Ok(choice)
    }

    fn last_error(&self, operation: Operation) -> MlmodError {
        MlmodError::operation_failed(
            self.controller
                .error()
                .unwrap_or(operation.fallback_message()),
        )
    }
}

fn confirm_delete(theme: &ColorfulTheme, id: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("Delete module {}?", id))
        .default(false)
        .interact()?;
    Ok(confirmed)
}
