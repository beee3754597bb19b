//! Scalaire velden: de "evalueer f in een punt" capability waar de iso-engine op draait.
//!
//! Een veld wordt nooit opgeslagen, alleen op aanvraag geëvalueerd. Fouten per punt
//! (deling door nul, logaritme van een negatief getal, overflow) worden als
//! [`FieldError`] teruggegeven en door de samplers lokaal opgevangen.

use std::fmt;

use thiserror::Error;

use crate::iso::Tolerance;

pub mod expression;

pub use expression::{ExpressionError, ExpressionField};

/// Fout bij het evalueren van een veld in één enkel punt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// De functie is in dit punt niet gedefinieerd.
    #[error("functie is niet gedefinieerd in dit punt")]
    Domain,
    /// De functie leverde NaN of oneindig op.
    #[error("functiewaarde is niet eindig")]
    NonFinite,
    /// De onderliggende evaluator gaf een fout.
    #[error("evaluatie mislukt: {0}")]
    Evaluate(String),
}

/// Een van de drie toegestane vrije variabelen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    X,
    Y,
    Z,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::X, Variable::Y, Variable::Z];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" | "X" => Some(Self::X),
            "y" | "Y" => Some(Self::Y),
            "z" | "Z" => Some(Self::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::X => 0b001,
            Self::Y => 0b010,
            Self::Z => 0b100,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verzameling vrije variabelen van een veld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VariableSet {
    bits: u8,
}

impl VariableSet {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const XY: Self = Self { bits: 0b011 };
    pub const XYZ: Self = Self { bits: 0b111 };

    #[must_use]
    pub const fn with(self, variable: Variable) -> Self {
        Self {
            bits: self.bits | variable.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, variable: Variable) -> bool {
        self.bits & variable.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Variable> {
        Variable::ALL.into_iter().filter(move |v| self.contains(*v))
    }
}

impl FromIterator<Variable> for VariableSet {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Een scalair veld f(x, y, z).
///
/// Velden zijn `Sync` zodat de samplers het grid over meerdere threads kunnen
/// verdelen wanneer de `parallel` feature actief is.
pub trait ScalarField: Sync {
    /// Evalueer het veld. Een `Ok` met een niet-eindige waarde wordt door
    /// [`ScalarField::sample`] alsnog als ongeldig behandeld.
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, FieldError>;

    /// De variabelen waar het veld van afhangt.
    fn variables(&self) -> VariableSet {
        VariableSet::XYZ
    }

    /// Evalueer met lokaal herstel: elke fout of niet-eindige waarde wordt NaN.
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        match self.evaluate(x, y, z) {
            Ok(value) if value.is_finite() => value,
            _ => f64::NAN,
        }
    }
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, FieldError> {
        (**self).evaluate(x, y, z)
    }

    fn variables(&self) -> VariableSet {
        (**self).variables()
    }
}

/// Adapter die een closure `(x, y, z) -> Option<f64>` als veld aanbiedt.
///
/// `None` betekent "niet gedefinieerd"; NaN en oneindig gelden als niet eindig.
#[derive(Clone, Copy)]
pub struct FnField<F> {
    variables: VariableSet,
    func: F,
}

impl<F> FnField<F>
where
    F: Fn(f64, f64, f64) -> Option<f64> + Sync,
{
    #[must_use]
    pub fn new(variables: VariableSet, func: F) -> Self {
        Self { variables, func }
    }

    /// Veld dat van x, y en z afhangt.
    #[must_use]
    pub fn xyz(func: F) -> Self {
        Self::new(VariableSet::XYZ, func)
    }

    /// Hoogteveld z = f(x, y); het derde argument wordt genegeerd.
    #[must_use]
    pub fn xy(func: F) -> Self {
        Self::new(VariableSet::XY, func)
    }
}

impl<F> fmt::Debug for FnField<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnField")
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

impl<F> ScalarField for FnField<F>
where
    F: Fn(f64, f64, f64) -> Option<f64> + Sync,
{
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, FieldError> {
        match (self.func)(x, y, z) {
            Some(value) if value.is_finite() => Ok(value),
            Some(_) => Err(FieldError::NonFinite),
            None => Err(FieldError::Domain),
        }
    }

    fn variables(&self) -> VariableSet {
        self.variables
    }
}

/// Numerieke partiële afgeleide via centrale differenties.
///
/// Wordt gebruikt wanneer de symbolische laag geen afgeleide aanlevert.
#[derive(Debug, Clone, Copy)]
pub struct NumericPartial<'a, F: ?Sized> {
    field: &'a F,
    variable: Variable,
}

impl<'a, F: ScalarField + ?Sized> NumericPartial<'a, F> {
    #[must_use]
    pub fn new(field: &'a F, variable: Variable) -> Self {
        Self { field, variable }
    }
}

impl<F: ScalarField + ?Sized> ScalarField for NumericPartial<'_, F> {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, FieldError> {
        let coordinate = match self.variable {
            Variable::X => x,
            Variable::Y => y,
            Variable::Z => z,
        };
        let h = Tolerance::DERIVATIVE.relative_to(coordinate.abs().max(1.0));
        let shift = |delta: f64| match self.variable {
            Variable::X => (x + delta, y, z),
            Variable::Y => (x, y + delta, z),
            Variable::Z => (x, y, z + delta),
        };

        let (xp, yp, zp) = shift(h);
        let (xm, ym, zm) = shift(-h);
        let forward = self.field.evaluate(xp, yp, zp)?;
        let backward = self.field.evaluate(xm, ym, zm)?;
        let derivative = (forward - backward) / (2.0 * h);
        if derivative.is_finite() {
            Ok(derivative)
        } else {
            Err(FieldError::NonFinite)
        }
    }

    fn variables(&self) -> VariableSet {
        self.field.variables()
    }
}
