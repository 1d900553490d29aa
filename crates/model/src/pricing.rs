use crate::decimal::Decimal;

/// Coupled percent/currency discount fields over a service-order subtotal.
/// The percent is authoritative and keeps four fractional digits so that
/// alternating between the two inputs does not drift.
#[derive(Debug, Clone, Default)]
pub struct DiscountForm {
    subtotal: Decimal,
    percent: Decimal,
    amount: Decimal,
}

impl DiscountForm {
    pub fn new(subtotal: Decimal) -> DiscountForm {
        DiscountForm {
            subtotal,
            percent: Decimal::zero(),
            amount: Decimal::zero(),
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn percent(&self) -> Decimal {
        self.percent
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn set_by_percent(&mut self, percent: Decimal) {
        self.percent = percent;
        self.amount = (self.subtotal * percent / Decimal::int(100)).round2();
    }

    /// With a zero subtotal a currency edit is a no-op: the percent keeps its
    /// last valid value instead of dividing by zero.
    pub fn set_by_currency(&mut self, amount: Decimal) {
        if self.subtotal.is_zero() {
            return;
        }
        self.amount = amount;
        // scale before dividing so the quotient keeps all four digits
        self.percent = amount * Decimal::int(100) / self.subtotal;
    }

    pub fn set_percent_input(&mut self, raw: &str) {
        self.set_by_percent(Decimal::parse_or_zero(raw));
    }

    pub fn set_currency_input(&mut self, raw: &str) {
        self.set_by_currency(Decimal::parse_or_zero(raw));
    }

    pub fn total(&self) -> Decimal {
        (self.subtotal - self.subtotal * self.percent / Decimal::int(100)).round2()
    }
}

/// Tank geometry in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TankShape {
    Rectangular {
        width_cm: Decimal,
        length_cm: Decimal,
        depth_cm: Decimal,
    },
    Cylindrical {
        diameter_cm: Decimal,
        depth_cm: Decimal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankQuote {
    pub liters: Decimal,
    pub total: Decimal,
}

impl TankShape {
    /// Builds the shape from raw form fields; missing or malformed
    /// dimensions count as zero and quote zero liters, never an error.
    pub fn rectangular_from_input(width: &str, length: &str, depth: &str) -> TankShape {
        TankShape::Rectangular {
            width_cm: Decimal::parse_or_zero(width),
            length_cm: Decimal::parse_or_zero(length),
            depth_cm: Decimal::parse_or_zero(depth),
        }
    }

    pub fn cylindrical_from_input(diameter: &str, depth: &str) -> TankShape {
        TankShape::Cylindrical {
            diameter_cm: Decimal::parse_or_zero(diameter),
            depth_cm: Decimal::parse_or_zero(depth),
        }
    }

    pub fn liters(&self) -> Decimal {
        let liters = match *self {
            TankShape::Rectangular {
                width_cm,
                length_cm,
                depth_cm,
            } => width_cm * length_cm * depth_cm / Decimal::int(1000),
            TankShape::Cylindrical {
                diameter_cm,
                depth_cm,
            } => {
                // pi has no exact fixed-point form, so the cylinder goes
                // through f64 and comes back rounded for display
                let radius = diameter_cm.to_f64() / 2.0;
                Decimal::from(std::f64::consts::PI * radius * radius * depth_cm.to_f64() / 1000.0)
            }
        };
        liters.round2()
    }

    pub fn quote(&self, price_per_liter: Decimal) -> TankQuote {
        let liters = self.liters();
        TankQuote {
            liters,
            total: (liters * price_per_liter).round2(),
        }
    }
}
