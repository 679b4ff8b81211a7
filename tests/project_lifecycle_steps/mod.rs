//! Step definitions for project lifecycle behaviour scenarios.


mod given;
