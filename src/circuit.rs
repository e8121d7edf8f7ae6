//! Series RC loop: component records and transient current
//!
//! Resistors and capacitors are combined in series regardless of where their
//! symbols are drawn on the loop. For a voltage step at `t = 0` the loop
//! current is
//!
//! ```text
//! I(t) = (V / Req) * exp(-t / tau),   tau = Req * Ceq
//! ```
//!
//! and a loop without capacitors carries the steady current `V / Req`.
//! Every input combination yields a finite current; degenerate circuits simply
//! carry zero current.

/// Ideal DC source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Battery {
    pub voltage: f64,
}

/// Lumped resistor
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub resistance: f64,
    pub name: String,
}

impl Resistor {
    pub fn new(name: impl Into<String>, resistance: f64) -> Self {
        Self {
            resistance,
            name: name.into(),
        }
    }

    /// Name resistors `R1..Rn` in list order
    pub fn numbered(values: &[f64]) -> Vec<Self> {
        values
            .iter()
            .enumerate()
            .map(|(i, &r)| Self::new(format!("R{}", i + 1), r))
            .collect()
    }
}

/// Lumped (ideal) capacitor
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    pub capacitance: f64,
    pub name: String,
}

impl Capacitor {
    pub fn new(name: impl Into<String>, capacitance: f64) -> Self {
        Self {
            capacitance,
            name: name.into(),
        }
    }

    /// Name capacitors `C1..Cn` in list order
    pub fn numbered(values: &[f64]) -> Vec<Self> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Self::new(format!("C{}", i + 1), c))
            .collect()
    }
}

/// Any element that can sit in the loop
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitElement {
    Battery(Battery),
    Resistor(Resistor),
    Capacitor(Capacitor),
}

/// Equivalent values and transient current of a series RC loop
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPhysics {
    voltage: f64,
    resistors: Vec<Resistor>,
    capacitors: Vec<Capacitor>,
    req: f64,
    ceq: Option<f64>,
    tau: Option<f64>,
}

impl CircuitPhysics {
    pub fn new(voltage: f64, resistors: Vec<Resistor>, capacitors: Vec<Capacitor>) -> Self {
        let req = if resistors.is_empty() {
            f64::INFINITY
        } else {
            resistors.iter().map(|r| r.resistance).sum()
        };

        let ceq = if capacitors.is_empty() {
            None
        } else {
            let inverse: f64 = capacitors.iter().map(|c| 1.0 / c.capacitance).sum();
            Some(if inverse > 0.0 { 1.0 / inverse } else { 0.0 })
        };

        let tau = ceq.map(|c| req * c);

        tracing::debug!(voltage, req, ?ceq, ?tau, "series loop equivalents");

        Self {
            voltage,
            resistors,
            capacitors,
            req,
            ceq,
            tau,
        }
    }

    /// Build from a mixed element list; the last battery supplies the voltage
    pub fn from_elements(elements: &[CircuitElement]) -> Self {
        let mut voltage = 0.0;
        let mut resistors = Vec::new();
        let mut capacitors = Vec::new();

        for element in elements {
            match element {
                CircuitElement::Battery(b) => voltage = b.voltage,
                CircuitElement::Resistor(r) => resistors.push(r.clone()),
                CircuitElement::Capacitor(c) => capacitors.push(c.clone()),
            }
        }

        Self::new(voltage, resistors, capacitors)
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn capacitors(&self) -> &[Capacitor] {
        &self.capacitors
    }

    /// Series resistance; infinite for a loop with no resistors
    pub fn req(&self) -> f64 {
        self.req
    }

    /// Series capacitance; `None` when the loop has no capacitors
    pub fn ceq(&self) -> Option<f64> {
        self.ceq
    }

    /// RC time constant; `None` when the loop has no capacitors
    pub fn tau(&self) -> Option<f64> {
        self.tau
    }

    /// Loop current in amps, `t` seconds after the voltage step
    pub fn current(&self, t: f64) -> f64 {
        // No resistor: the ideal capacitor-only loop has no finite answer, so
        // it carries nothing.
        if !self.req.is_finite() || self.req <= 0.0 {
            return 0.0;
        }
        if self.ceq.is_none() {
            return self.voltage / self.req;
        }
        match self.tau {
            Some(tau) if tau > 0.0 => (self.voltage / self.req) * (-t / tau).exp(),
            _ => 0.0,
        }
    }
}
