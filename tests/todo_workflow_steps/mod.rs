//! Step definitions for task list behaviour scenarios.
