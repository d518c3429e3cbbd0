//! Action programs: the per-sprite block lists built on the assembly surface
//! and the compiled plans the interpreter walks.

pub mod action_program;
pub mod editor;
pub mod plan;

pub use action_program::{ActionProgram, EditError, ProgramMap, StagePrograms};
pub use editor::ProgramEditor;
pub use plan::{PlaybackPlan, PlannedStep};
