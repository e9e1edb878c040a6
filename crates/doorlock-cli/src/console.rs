//! Terminal-backed peripherals for the interactive simulator.

use std::io::{self, Stdout, Write};

use doorlock_controller::VirtualDisplay;
use doorlock_core::ActuatorKind;
use doorlock_hardware::{ActuatorOutput, DisplaySink, LedPin, LockActuator, Result};
use tracing::trace;

/// Prints the 16x2 panel whenever its content changes.
#[derive(Debug)]
pub struct ConsoleDisplay<W = Stdout> {
    panel: VirtualDisplay,
    out: W,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            panel: VirtualDisplay::lcd_16x2(),
            out,
        }
    }
}

impl<W: Write> DisplaySink for ConsoleDisplay<W> {
    fn show_status(&mut self, line1: &str, line2: &str) -> Result<()> {
        if self.panel.write_status(line1, line2) {
            writeln!(self.out, "{}", self.panel.render())?;
        }
        Ok(())
    }
}

/// Announces lock state changes on the terminal.
#[derive(Debug)]
pub struct ConsoleLock<W = Stdout> {
    kind: ActuatorKind,
    engaged: bool,
    out: W,
}

impl ConsoleLock {
    pub fn new(kind: ActuatorKind) -> Self {
        Self::with_writer(kind, io::stdout())
    }
}

impl<W: Write> ConsoleLock<W> {
    pub fn with_writer(kind: ActuatorKind, out: W) -> Self {
        Self {
            kind,
            engaged: false,
            out,
        }
    }
}

impl<W: Write> LockActuator for ConsoleLock<W> {
    fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        if engaged != self.engaged {
            let output = ActuatorOutput::for_state(self.kind, engaged);
            let label = if engaged { "OPEN" } else { "CLOSED" };
            writeln!(self.out, "[lock] {label} ({output:?})")?;
        }
        self.engaged = engaged;
        Ok(())
    }

    fn is_engaged(&self) -> bool {
        self.engaged
    }
}

/// Status LED; level changes go to the trace log.
#[derive(Debug, Default)]
pub struct ConsoleLed {
    on: bool,
}

impl LedPin for ConsoleLed {
    fn write(&mut self, on: bool) {
        if on != self.on {
            trace!(on, "status led");
        }
        self.on = on;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
