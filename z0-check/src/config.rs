//! Tunable names the checker matches against callee strings in the IR.
//!
//! These are configurable because the "prefix is configurable" per the
//! external interface contract: the producing compiler is free to mangle
//! its contract-marker and intrinsic names differently, as long as it tells
//! the checker what it picked.

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Functions analysed are those whose name starts with this prefix.
    pub function_prefix: String,
    /// Debug-value annotations are only recorded when the source name
    /// starts with this marker, or equals `result_var_name`.
    pub user_var_marker: String,
    /// The synthesized name under which a function's return value is
    /// recorded for `ensures` counterexamples.
    pub result_var_name: String,
    pub requires_marker: String,
    pub ensures_marker: String,
    pub loop_invariant_marker: String,
    pub assert_marker: String,
    pub div_intrinsic: String,
    pub mod_intrinsic: String,
    pub debug_value_callee: String,
    pub debug_declare_callee: String,
    /// Forwarded to the Z3 solver as `timeout` (milliseconds). `None` means
    /// no timeout is set and the solver runs to completion or until it
    /// gives up on its own.
    pub solver_timeout_ms: Option<u32>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            function_prefix: "_c0_".to_string(),
            user_var_marker: "_c0v_".to_string(),
            result_var_name: "_c0_result".to_string(),
            requires_marker: "requires".to_string(),
            ensures_marker: "ensures".to_string(),
            loop_invariant_marker: "loop_invariant".to_string(),
            assert_marker: "assert".to_string(),
            div_intrinsic: "c0_idiv".to_string(),
            mod_intrinsic: "c0_imod".to_string(),
            debug_value_callee: "dbg_value".to_string(),
            debug_declare_callee: "dbg_declare".to_string(),
            solver_timeout_ms: None,
        }
    }
}

impl CheckConfig {
    pub fn is_recorded_debug_name(&self, name: &str) -> bool {
        name.starts_with(&self.user_var_marker) || name == self.result_var_name
    }

    pub fn display_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.user_var_marker.as_str()).unwrap_or(name)
    }
}
