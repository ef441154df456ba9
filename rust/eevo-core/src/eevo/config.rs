//! Evaluator configuration.

/// Tunables for one `Evaluator`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalConfig {
    /// Maximum nesting of `eval` calls before `excessive-nesting` is signalled.
    pub max_depth: usize,
    /// Multiplier applied to elapsed CPU seconds by the `time` form.
    pub time_scale: f64,
    /// Signal `wrong-type-argument` for non-text `sys` arguments instead of
    /// warning and skipping them.
    pub strict_sys_args: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: 200,
            time_scale: 100.0,
            strict_sys_args: false,
        }
    }
}

impl EvalConfig {
    /// Defaults overlaid with `EEVO_MAX_DEPTH`, `EEVO_TIME_SCALE` and
    /// `EEVO_STRICT_SYS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.  Unparseable
    /// values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup("EEVO_MAX_DEPTH") {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => log::warn!("ignoring EEVO_MAX_DEPTH={raw:?}: expected a positive integer"),
            }
        }
        if let Some(raw) = lookup("EEVO_TIME_SCALE") {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => config.time_scale = scale,
                _ => log::warn!("ignoring EEVO_TIME_SCALE={raw:?}: expected a positive number"),
            }
        }
        if let Some(raw) = lookup("EEVO_STRICT_SYS") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.strict_sys_args = true,
                "0" | "false" | "no" | "off" | "" => config.strict_sys_args = false,
                _ => log::warn!("ignoring EEVO_STRICT_SYS={raw:?}: expected a boolean"),
            }
        }
        config
    }
}
