//! Velden op basis van een tekstuele expressie, geëvalueerd met `meval`.
//!
//! Dit is alleen numerieke evaluatie; symbolisch differentiëren of integreren
//! hoort bij de aanroepende laag.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use meval::{Context, ContextProvider, Expr};
use regex::Regex;
use thiserror::Error;

use super::{FieldError, NumericPartial, ScalarField, Variable, VariableSet};

static DIGIT_BEFORE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*([a-z])").expect("geldige regex"));
static LETTERS_WITH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])\s+([a-z])").expect("geldige regex"));

thread_local! {
    static FUNCTIONS: Context<'static> = build_context();
}

/// Fouttype bij het voorbereiden van een expressie.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("expressie is leeg")]
    Empty,
    #[error("expressie kon niet geparst worden: {0}")]
    Parse(String),
    #[error("variabelen niet toegestaan: {}. Alleen x, y, z.", .0.join(", "))]
    DisallowedVariable(Vec<String>),
}

/// Een geparste expressie in x, y en z.
#[derive(Debug, Clone)]
pub struct ExpressionField {
    source: String,
    expr: Expr,
    variables: VariableSet,
}

impl ExpressionField {
    /// Normaliseert en parst `source`, en controleert de vrije variabelen.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let normalized = normalize_expression(source);
        if normalized.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let expr = normalized
            .parse::<Expr>()
            .map_err(|error| ExpressionError::Parse(error.to_string()))?;

        let variables = FUNCTIONS.with(|context| free_variables(&expr, context))?;

        let field = Self {
            source: normalized,
            expr,
            variables,
        };

        log::debug!(
            "expressie `{}` geparst, variabelen: {:?}",
            field.source,
            field.variables.iter().map(Variable::name).collect::<Vec<_>>()
        );
        Ok(field)
    }

    /// De genormaliseerde brontekst.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Numerieke partiële afgeleide naar `variable`.
    #[must_use]
    pub fn partial(&self, variable: Variable) -> NumericPartial<'_, Self> {
        NumericPartial::new(self, variable)
    }

    fn eval_raw(&self, x: f64, y: f64, z: f64) -> Result<f64, meval::Error> {
        let coordinates = CoordinateContext { x, y, z };
        FUNCTIONS.with(|context| self.expr.eval_with_context((&coordinates, context)))
    }
}

impl ScalarField for ExpressionField {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, FieldError> {
        let value = self
            .eval_raw(x, y, z)
            .map_err(|error| FieldError::Evaluate(error.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FieldError::NonFinite)
        }
    }

    fn variables(&self) -> VariableSet {
        self.variables
    }
}

struct CoordinateContext {
    x: f64,
    y: f64,
    z: f64,
}

impl ContextProvider for CoordinateContext {
    fn get_var(&self, name: &str) -> Option<f64> {
        match name {
            "x" => Some(self.x),
            "y" => Some(self.y),
            "z" => Some(self.z),
            _ => None,
        }
    }
}

/// Registreert elke naam die de context zelf niet kent.
struct VariableRecorder<'a> {
    context: &'a Context<'static>,
    seen: RefCell<BTreeSet<String>>,
}

impl ContextProvider for VariableRecorder<'_> {
    fn get_var(&self, name: &str) -> Option<f64> {
        if self.context.get_var(name).is_some() {
            return None;
        }
        self.seen.borrow_mut().insert(name.to_owned());
        Some(1.0)
    }
}

/// Bepaalt de vrije variabelen met een proefevaluatie. Onbekende functies of
/// een verkeerd aantal argumenten komen daarbij ook al naar boven.
fn free_variables(expr: &Expr, context: &Context<'static>) -> Result<VariableSet, ExpressionError> {
    let recorder = VariableRecorder {
        context,
        seen: RefCell::new(BTreeSet::new()),
    };

    if let Err(error) = expr.eval_with_context((&recorder, context)) {
        return Err(ExpressionError::Parse(error.to_string()));
    }

    let mut variables = VariableSet::EMPTY;
    let mut disallowed = Vec::new();
    for name in recorder.seen.into_inner() {
        match Variable::from_name(&name) {
            Some(variable) => variables = variables.with(variable),
            None => disallowed.push(name),
        }
    }

    if disallowed.is_empty() {
        Ok(variables)
    } else {
        Err(ExpressionError::DisallowedVariable(disallowed))
    }
}

/// Basisnormalisatie van gebruikersinvoer: kleine letters, `**` als macht en
/// impliciete vermenigvuldiging (`2x` → `2*x`, `x y` → `x*y`).
#[must_use]
pub fn normalize_expression(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.to_lowercase().replace("**", "^");
    while normalized.ends_with(';') {
        normalized.pop();
        normalized = normalized.trim_end().to_owned();
    }

    normalized = DIGIT_BEFORE_LETTER
        .replace_all(&normalized, "${1}*${2}")
        .into_owned();
    loop {
        let next = LETTERS_WITH_SPACE
            .replace_all(&normalized, "${1}*${2}")
            .into_owned();
        if next == normalized {
            break;
        }
        normalized = next;
    }

    normalized
}

fn build_context() -> Context<'static> {
    let mut context = Context::new();
    context.func3("clamp", clamp);
    context.func3("lerp", lerp);
    context.func("log", f64::ln);
    context.func("deg", f64::to_degrees);
    context.func("rad", f64::to_radians);
    context.func("frac", f64::fract);
    context.func2("mod", modulo);
    context.func("sign", f64::signum);
    context.func("sgn", f64::signum);
    context.func("sec", |value| 1.0 / value.cos());
    context.func("csc", |value| 1.0 / value.sin());
    context.func("cot", |value| 1.0 / value.tan());
    context.funcn("if", conditional, 2..4);
    context
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let lower = min.min(max);
    let upper = min.max(max);
    value.max(lower).min(upper)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn modulo(dividend: f64, divisor: f64) -> f64 {
    if divisor == 0.0 {
        return f64::NAN;
    }
    let remainder = dividend % divisor;
    if remainder == 0.0 {
        0.0
    } else if (divisor > 0.0 && remainder < 0.0) || (divisor < 0.0 && remainder > 0.0) {
        remainder + divisor
    } else {
        remainder
    }
}

fn conditional(args: &[f64]) -> f64 {
    let truthy = args[1];
    let falsy = if args.len() == 3 { args[2] } else { truthy };
    if args[0] != 0.0 { truthy } else { falsy }
}
