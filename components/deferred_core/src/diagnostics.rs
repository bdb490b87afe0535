//! Diagnostic events for deferred values.
//!
//! Neither event changes observable settlement semantics. Double settlement
//! stays a silent no-op and an unobserved rejection is a leak, not a crash;
//! both are surfaced so they can be diagnosed. Events always reach
//! `tracing`; a [`Diagnostics`] attachment additionally delivers them to a
//! hook and lets the unobserved-rejection report be switched off.

use std::fmt;

/// A diagnosable event on a deferred value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A settle call arrived after the value had already settled and was
    /// ignored.
    DoubleSettlement,
    /// A rejected value was dropped without any reaction consuming the
    /// reason.
    UnobservedRejection,
}

type Hook = Box<dyn Fn(DiagnosticEvent)>;

/// Hook set attachable to a deferred value via
/// [`Deferred::set_diagnostics`](crate::Deferred::set_diagnostics).
///
/// Shared by `Rc` and inherited by derived values through chaining.
pub struct Diagnostics {
    report_unobserved: bool,
    hook: Option<Hook>,
}

impl Diagnostics {
    /// Diagnostics with no hook and unobserved-rejection reporting on.
    pub fn new() -> Self {
        Self {
            report_unobserved: true,
            hook: None,
        }
    }

    /// Diagnostics delivering every event to `hook`.
    pub fn with_hook<F>(hook: F) -> Self
    where
        F: Fn(DiagnosticEvent) + 'static,
    {
        Self {
            report_unobserved: true,
            hook: Some(Box::new(hook)),
        }
    }

    /// Disables unobserved-rejection reporting.
    ///
    /// Some code legitimately discards rejected values, the losing side of a
    /// `race`-built timeout being the usual case.
    pub fn silence_unobserved(mut self) -> Self {
        self.report_unobserved = false;
        self
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("report_unobserved", &self.report_unobserved)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

pub(crate) fn report(diagnostics: Option<&Diagnostics>, event: DiagnosticEvent) {
    match event {
        DiagnosticEvent::DoubleSettlement => {
            tracing::debug!("settlement attempt on an already-settled value ignored");
        }
        DiagnosticEvent::UnobservedRejection => {
            if let Some(d) = diagnostics {
                if !d.report_unobserved {
                    return;
                }
            }
            tracing::warn!("rejected value dropped without its reason being observed");
        }
    }
    if let Some(d) = diagnostics {
        if let Some(hook) = &d.hook {
            hook(event);
        }
    }
}
