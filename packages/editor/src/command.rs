//! # Command Registry
//!
//! Named, palette-visible operations bound to keyboard shortcuts.
//!
//! ## Design
//!
//! - Registration is idempotent per registry instance; the "built-ins
//!   registered" flag lives on the registry itself, never at module level,
//!   so independent editor instances (and tests) do not share state
//! - The execution context is rebuilt on every dispatch, never cached
//! - Commands that need asynchronous work (AI transforms, saves) push a
//!   [`UiEvent`] and return immediately; completions re-enter through
//!   ordinary store dispatch
//! - Shortcut matching is first-match-wins; the caller suppresses default
//!   handling when a match ran

use deckflow_schema::Slide;
use serde::Serialize;
use tracing::warn;

use crate::action::Action;
use crate::keyboard::{KeyInput, Platform, Shortcut};
use crate::store::DocumentStore;

/// Palette grouping for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandCategory {
    Navigation,
    Editing,
    History,
    File,
    Ai,
}

/// Notification emitted by a command for the UI layer to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The user asked for an AI transform of a slide; the caller starts
    /// the round trip and re-enters via `AiReplaceSlide`/`AiSplitSlide`.
    TransformRequested { slide_index: usize },
    /// The user asked for image generation for a slide.
    ImageRequested { slide_index: usize },
    /// The user asked to persist the deck.
    SaveRequested,
}

/// Everything a command may read or touch, rebuilt per dispatch.
pub struct CommandContext<'a> {
    pub store: &'a mut DocumentStore,
    pub events: &'a mut Vec<UiEvent>,
}

impl CommandContext<'_> {
    pub fn selected_index(&self) -> usize {
        self.store.state().selected_slide
    }

    pub fn slide_count(&self) -> usize {
        self.store.deck().slides.len()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn notify(&mut self, event: UiEvent) {
        self.events.push(event);
    }
}

/// One registered command.
pub struct Command {
    pub id: &'static str,
    pub label: &'static str,
    pub shortcut: Option<Shortcut>,
    pub category: CommandCategory,
    pub description: &'static str,
    run: fn(&mut CommandContext<'_>),
}

impl Command {
    pub fn new(
        id: &'static str,
        label: &'static str,
        shortcut: Option<Shortcut>,
        category: CommandCategory,
        description: &'static str,
        run: fn(&mut CommandContext<'_>),
    ) -> Self {
        Self {
            id,
            label,
            shortcut,
            category,
            description,
            run,
        }
    }

    pub fn run(&self, ctx: &mut CommandContext<'_>) {
        (self.run)(ctx)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("shortcut", &self.shortcut)
            .finish()
    }
}

/// Queryable command metadata for palette/help rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSummary {
    pub id: &'static str,
    pub label: &'static str,
    pub shortcut: Option<&'static str>,
    pub category: CommandCategory,
    pub description: &'static str,
}

/// Registry of commands plus their keyboard bindings.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    builtins_registered: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            builtins_registered: false,
        }
    }

    /// Register a command. Duplicate ids are rejected with a warning so
    /// re-registration cannot shadow an existing binding.
    pub fn register(&mut self, command: Command) -> bool {
        if self.commands.iter().any(|c| c.id == command.id) {
            warn!(id = command.id, "command already registered, ignoring");
            return false;
        }
        self.commands.push(command);
        true
    }

    /// Register the built-in command set. Safe to call repeatedly; only
    /// the first call does anything.
    pub fn register_builtins(&mut self) {
        if self.builtins_registered {
            return;
        }
        self.builtins_registered = true;
        for command in builtin_commands() {
            self.register(command);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Palette listing, in registration order.
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands
            .iter()
            .map(|c| CommandSummary {
                id: c.id,
                label: c.label,
                shortcut: c.shortcut.map(|s| s.as_str()),
                category: c.category,
                description: c.description,
            })
            .collect()
    }

    /// First command whose shortcut matches `input` on `platform`.
    pub fn match_key(&self, platform: Platform, input: &KeyInput) -> Option<&Command> {
        self.commands.iter().find(|c| {
            c.shortcut
                .map_or(false, |shortcut| shortcut.matches(platform, input))
        })
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_commands() -> Vec<Command> {
    vec![
        Command {
            id: "history.undo",
            label: "Undo",
            shortcut: Some(Shortcut("mod-z")),
            category: CommandCategory::History,
            description: "Revert the most recent edit",
            run: |ctx| {
                ctx.store.undo();
            },
        },
        Command {
            id: "history.redo",
            label: "Redo",
            shortcut: Some(Shortcut("mod-shift-z")),
            category: CommandCategory::History,
            description: "Reapply the most recently undone edit",
            run: |ctx| {
                ctx.store.redo();
            },
        },
        Command {
            id: "slide.add",
            label: "Add Slide",
            shortcut: Some(Shortcut("mod-enter")),
            category: CommandCategory::Editing,
            description: "Insert an empty slide after the current one",
            run: |ctx| {
                let index = ctx.selected_index() + 1;
                ctx.dispatch(Action::AddSlide {
                    slide: Slide::new("content"),
                    index: Some(index),
                });
            },
        },
        Command {
            id: "slide.delete",
            label: "Delete Slide",
            shortcut: Some(Shortcut("mod-backspace")),
            category: CommandCategory::Editing,
            description: "Remove the current slide",
            run: |ctx| {
                let index = ctx.selected_index();
                ctx.dispatch(Action::DeleteSlide { index });
            },
        },
        Command {
            id: "slide.duplicate",
            label: "Duplicate Slide",
            shortcut: Some(Shortcut("mod-d")),
            category: CommandCategory::Editing,
            description: "Insert a copy of the current slide after it",
            run: |ctx| {
                let index = ctx.selected_index();
                ctx.dispatch(Action::DuplicateSlide { index });
            },
        },
        Command {
            id: "slide.next",
            label: "Next Slide",
            shortcut: Some(Shortcut("mod-arrowdown")),
            category: CommandCategory::Navigation,
            description: "Select the next slide",
            run: |ctx| {
                let next = ctx.selected_index() + 1;
                if next < ctx.slide_count() {
                    ctx.dispatch(Action::SelectSlide { index: next });
                }
            },
        },
        Command {
            id: "slide.previous",
            label: "Previous Slide",
            shortcut: Some(Shortcut("mod-arrowup")),
            category: CommandCategory::Navigation,
            description: "Select the previous slide",
            run: |ctx| {
                let current = ctx.selected_index();
                if current > 0 {
                    ctx.dispatch(Action::SelectSlide { index: current - 1 });
                }
            },
        },
        Command {
            id: "deck.save",
            label: "Save",
            shortcut: Some(Shortcut("mod-s")),
            category: CommandCategory::File,
            description: "Persist the deck",
            run: |ctx| {
                ctx.notify(UiEvent::SaveRequested);
            },
        },
        Command {
            id: "ai.transform-slide",
            label: "Transform Slide…",
            shortcut: None,
            category: CommandCategory::Ai,
            description: "Rewrite the current slide with an AI instruction",
            run: |ctx| {
                let slide_index = ctx.selected_index();
                ctx.notify(UiEvent::TransformRequested { slide_index });
            },
        },
        Command {
            id: "ai.generate-image",
            label: "Generate Slide Image",
            shortcut: None,
            category: CommandCategory::Ai,
            description: "Generate an image for the current slide",
            run: |ctx| {
                let slide_index = ctx.selected_index();
                ctx.notify(UiEvent::ImageRequested { slide_index });
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_schema::Deck;

    fn ctx_parts() -> (DocumentStore, Vec<UiEvent>) {
        (DocumentStore::new(Deck::new_template("cmd")), Vec::new())
    }

    #[test]
    fn test_builtin_registration_is_idempotent() {
        let mut registry = CommandRegistry::new();
        registry.register_builtins();
        let count = registry.len();
        assert!(count > 0);

        registry.register_builtins();
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register_builtins();
        let rejected = registry.register(Command {
            id: "history.undo",
            label: "Shadow Undo",
            shortcut: None,
            category: CommandCategory::History,
            description: "",
            run: |_| {},
        });
        assert!(!rejected);
        assert_eq!(registry.get("history.undo").unwrap().label, "Undo");
    }

    #[test]
    fn test_match_key_finds_undo() {
        let mut registry = CommandRegistry::new();
        registry.register_builtins();

        let hit = registry
            .match_key(Platform::Other, &KeyInput::new("z").ctrl())
            .unwrap();
        assert_eq!(hit.id, "history.undo");

        let miss = registry.match_key(Platform::Other, &KeyInput::new("z"));
        assert!(miss.is_none());
    }

    #[test]
    fn test_save_command_emits_event_without_touching_state() {
        let (mut store, mut events) = ctx_parts();
        let mut registry = CommandRegistry::new();
        registry.register_builtins();

        let cmd = registry.get("deck.save").unwrap();
        let run = cmd.run;
        let mut ctx = CommandContext {
            store: &mut store,
            events: &mut events,
        };
        run(&mut ctx);

        assert_eq!(events, vec![UiEvent::SaveRequested]);
        assert!(!store.state().is_dirty);
    }

    #[test]
    fn test_summaries_expose_palette_fields() {
        let mut registry = CommandRegistry::new();
        registry.register_builtins();

        let summaries = registry.summaries();
        let undo = summaries.iter().find(|s| s.id == "history.undo").unwrap();
        assert_eq!(undo.shortcut, Some("mod-z"));
        assert_eq!(undo.category, CommandCategory::History);
    }
}
