use serde::{Deserialize, Serialize};

use super::dice::Dice;
use super::Problem;
use crate::magic::MagicType;

/// 复数模长题使用的勾股数。
const PYTHAGOREAN_TRIPLES: [(i64, i64, i64); 4] =
    [(5, 12, 13), (8, 15, 17), (7, 24, 25), (20, 21, 29)];

const WATER_SPECIFIC_HEAT: f64 = 4.2;
const GAS_CONSTANT: f64 = 8.3;

/// 题型：类别 × 难度档位。每个变体对应一个纯函数。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    OhmsLaw,
    ElectricPower,
    WaveSpeed,
    FahrenheitConversion,
    SpecificHeat,
    IdealGas,
    AddSubtract,
    MultiplyDivide,
    LinearEquation,
    QuadraticEvaluation,
    PowerRuleDerivative,
    DefiniteIntegral,
    Determinant,
    Logarithm,
    ComplexMagnitude,
    RiemannHypothesis,
}

/// 电学 / 热学的粗粒度档位：`ceil(circle / 3)`。第 0 圈落到最高档。
pub fn physics_tier(circle: u32) -> u32 {
    circle.div_ceil(3)
}

impl ProblemKind {
    pub fn select(circle: u32, category: MagicType) -> Self {
        match category {
            MagicType::Lightning => match physics_tier(circle) {
                1 => ProblemKind::OhmsLaw,
                2 => ProblemKind::ElectricPower,
                _ => ProblemKind::WaveSpeed,
            },
            MagicType::Ice => match physics_tier(circle) {
                1 => ProblemKind::FahrenheitConversion,
                2 => ProblemKind::SpecificHeat,
                _ => ProblemKind::IdealGas,
            },
            MagicType::Arcane => match circle {
                1 => ProblemKind::AddSubtract,
                2 => ProblemKind::MultiplyDivide,
                3 => ProblemKind::LinearEquation,
                4 => ProblemKind::QuadraticEvaluation,
                5 => ProblemKind::PowerRuleDerivative,
                6 => ProblemKind::DefiniteIntegral,
                7 => ProblemKind::Determinant,
                8 => ProblemKind::Logarithm,
                9 => ProblemKind::ComplexMagnitude,
                _ => ProblemKind::RiemannHypothesis,
            },
        }
    }

    pub fn category(&self) -> MagicType {
        match self {
            ProblemKind::OhmsLaw | ProblemKind::ElectricPower | ProblemKind::WaveSpeed => {
                MagicType::Lightning
            }
            ProblemKind::FahrenheitConversion
            | ProblemKind::SpecificHeat
            | ProblemKind::IdealGas => MagicType::Ice,
            _ => MagicType::Arcane,
        }
    }

    pub fn build<D: Dice + ?Sized>(self, dice: &mut D) -> Problem {
        let (text, answer, hint) = match self {
            ProblemKind::OhmsLaw => ohms_law(dice),
            ProblemKind::ElectricPower => electric_power(dice),
            ProblemKind::WaveSpeed => wave_speed(dice),
            ProblemKind::FahrenheitConversion => fahrenheit_conversion(dice),
            ProblemKind::SpecificHeat => specific_heat(dice),
            ProblemKind::IdealGas => ideal_gas(dice),
            ProblemKind::AddSubtract => add_subtract(dice),
            ProblemKind::MultiplyDivide => multiply_divide(dice),
            ProblemKind::LinearEquation => linear_equation(dice),
            ProblemKind::QuadraticEvaluation => quadratic_evaluation(dice),
            ProblemKind::PowerRuleDerivative => power_rule_derivative(dice),
            ProblemKind::DefiniteIntegral => definite_integral(dice),
            ProblemKind::Determinant => determinant(dice),
            ProblemKind::Logarithm => logarithm(dice),
            ProblemKind::ComplexMagnitude => complex_magnitude(dice),
            ProblemKind::RiemannHypothesis => riemann_hypothesis(),
        };
        Problem {
            kind: self,
            text,
            answer,
            hint,
        }
    }
}

type Parts = (String, f64, String);

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn ohms_law<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let i = dice.roll(2, 20);
    let r = dice.roll(10, 100);
    (
        format!("Ohm's Law (V=IR)<br>I={i}A, R={r}Ω. Find V."),
        (i * r) as f64,
        "Multiply Current (I) by Resistance (R).".to_string(),
    )
}

fn electric_power<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let v = dice.roll(100, 240);
    let i = dice.roll(5, 50);
    (
        format!("Electric Power (P=VI)<br>V={v}V, I={i}A. Find P (Watts)."),
        (v * i) as f64,
        "Multiply Voltage (V) by Current (I).".to_string(),
    )
}

fn wave_speed<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let khz = dice.roll(1, 50);
    let lambda = dice.roll(1, 100);
    let hz = khz * 1000;
    (
        format!("Wave Speed (v=fλ)<br>f={khz}kHz, λ={lambda}m. Find v (m/s)."),
        (hz * lambda) as f64,
        "Multiply Frequency (Hz) by Wavelength (λ). Remember 1kHz = 1000Hz.".to_string(),
    )
}

fn fahrenheit_conversion<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let c = dice.roll(10, 100);
    (
        format!("Convert to Fahrenheit<br>{c}°C"),
        round_to(c as f64 * 1.8 + 32.0, 1),
        "Multiply by 1.8 and add 32. 1 decimal place.".to_string(),
    )
}

fn specific_heat<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let m = dice.roll(5, 50);
    let dt = dice.roll(10, 50);
    let c = WATER_SPECIFIC_HEAT;
    (
        format!("Heat Energy (Q=mcΔT)<br>m={m}kg, c={c}, ΔT={dt}. Find Q."),
        round_to(m as f64 * c * dt as f64, 1),
        "Multiply m * c * ΔT.".to_string(),
    )
}

fn ideal_gas<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let n = dice.roll(2, 10);
    let t = dice.roll(273, 373);
    let v = dice.roll(10, 50);
    let r = GAS_CONSTANT;
    (
        format!("Ideal Gas (PV=nRT)<br>V={v}, n={n}, R={r}, T={t}. Find P."),
        round_to(n as f64 * r * t as f64 / v as f64, 1),
        "P = (nRT) / V. Round to 1 decimal.".to_string(),
    )
}

fn add_subtract<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let add = dice.coin();
    let mut a = dice.roll(100, 999);
    let mut b = dice.roll(50, 500);
    if !add && a < b {
        std::mem::swap(&mut a, &mut b);
    }
    let (op, answer, verb) = if add {
        ('+', a + b, "add")
    } else {
        ('-', a - b, "subtract")
    };
    (
        format!("{a} {op} {b}"),
        answer as f64,
        format!("Simply {verb} using column method."),
    )
}

fn multiply_divide<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    if dice.coin() {
        let a = dice.roll(11, 50);
        let b = dice.roll(11, 20);
        (
            format!("{a} × {b}"),
            (a * b) as f64,
            format!("Multiply {a} by {b}."),
        )
    } else {
        // 被除数由商反推，保证整除
        let divisor = dice.roll(5, 20);
        let quotient = dice.roll(15, 50);
        let dividend = divisor * quotient;
        (
            format!("{dividend} ÷ {divisor}"),
            quotient as f64,
            format!("{divisor} times what equals {dividend}?"),
        )
    }
}

fn linear_equation<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let x = dice.roll(5, 20);
    let a = dice.roll(3, 15);
    let b = dice.roll(10, 100);
    let c = a * x + b;
    (
        format!("Solve x: <br>{a}x + {b} = {c}"),
        x as f64,
        format!("First subtract {b} from {c}, then divide the result by {a}."),
    )
}

fn quadratic_evaluation<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let x = dice.roll(3, 10);
    let a = dice.roll(2, 5);
    let b = dice.roll(10, 50);
    (
        format!("f(x) = {a}x² + {b}<br>Find f({x})"),
        (a * x * x + b) as f64,
        format!("Square {x} first, multiply by {a}, then add {b}."),
    )
}

fn power_rule_derivative<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let a = dice.roll(2, 10);
    let n = dice.roll(3, 5);
    let x = dice.roll(2, 3);
    let answer = a * n * x.pow((n - 1) as u32);
    (
        format!("d/dx({a}x<sup>{n}</sup>) at x={x}"),
        answer as f64,
        format!("Calculate {a} * {n} * {x}^({n}-1)."),
    )
}

fn definite_integral<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let a = dice.roll(2, 4);
    let n = dice.roll(1, 2);
    let upper = dice.roll(2, 4);
    let raw = (a * upper.pow((n + 1) as u32)) as f64 / (n + 1) as f64;
    (
        format!("∫<sub>0</sub><sup>{upper}</sup> {a}x<sup>{n}</sup> dx"),
        round_to(raw, 2),
        format!(
            "Antiderivative is {a}x^{}/{}. Evaluate at {upper}.",
            n + 1,
            n + 1
        ),
    )
}

fn determinant<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let a = dice.roll(1, 10);
    let b = dice.roll(1, 10);
    let c = dice.roll(1, 10);
    let d = dice.roll(1, 10);
    (
        format!("| {a}  {b} |<br>| {c}  {d} |"),
        (a * d - b * c) as f64,
        format!("({a}*{d}) - ({b}*{c}). Watch the signs!"),
    )
}

fn logarithm<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let base = dice.roll(3, 8);
    let exponent = dice.roll(2, 4);
    let value = base.pow(exponent as u32);
    (
        format!("log<sub>{base}</sub>({value})"),
        exponent as f64,
        format!("{base} to what power equals {value}?"),
    )
}

fn complex_magnitude<D: Dice + ?Sized>(dice: &mut D) -> Parts {
    let index = dice.roll(0, PYTHAGOREAN_TRIPLES.len() as i64 - 1);
    let (re, im, hypotenuse) = PYTHAGOREAN_TRIPLES[index.clamp(0, 3) as usize];
    (
        format!("|{re} + {im}i|"),
        hypotenuse as f64,
        format!("Sqrt({re}² + {im}²). Pythagorean triple."),
    )
}

fn riemann_hypothesis() -> Parts {
    (
        "Propove the Riemann Hypothesis<br>(ζ(s) = 0 ⇒ Re(s) = ?)".to_string(),
        0.5,
        "The critical line. Re(s) = 1/2.".to_string(),
    )
}
