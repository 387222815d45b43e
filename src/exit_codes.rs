//! Exit code constants for the forta-tasks CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or invalid host config)
//! - 2: Agent command failure (the agent CLI failed or could not be launched)
//! - 3: Agent selection failure (no agent project, or an ambiguous choice)
//! - 4: Template generation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid host configuration.
pub const USER_ERROR: i32 = 1;

/// The agent CLI exited unsuccessfully or could not be spawned.
pub const COMMAND_FAILURE: i32 = 2;

/// No agent project could be selected under the context path.
pub const AGENT_SELECTION_FAILURE: i32 = 3;

/// The project template could not be written.
pub const TEMPLATE_FAILURE: i32 = 4;
