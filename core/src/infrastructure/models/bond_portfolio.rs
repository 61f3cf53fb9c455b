// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Bond Portfolio Risk Model (demo)
//!
//! A simplified fixed-income model for a mixed government / IG / HY portfolio.
//! Mark-to-market P&L uses a duration/convexity approximation measured against
//! the fixed base yields and spreads below.

use crate::domain::model::{InputField, InputSet, ModelSchema, OutputField, OutputSet, ScenarioDefinition};
use crate::domain::repository::{RepositoryError, RunnerError};
use crate::infrastructure::repositories::InMemoryModelRepository;
use crate::infrastructure::runners::{require, FunctionalScenarioRunner};

const BASE_YIELD_10Y: f64 = 4.25;
const BASE_YIELD_2Y: f64 = 4.80;
const BASE_SPREAD_IG: f64 = 1.20;
const BASE_SPREAD_HY: f64 = 3.50;

pub fn base_inputs() -> InputSet {
    InputSet::from([
        ("yield_10y", BASE_YIELD_10Y),
        ("yield_2y", BASE_YIELD_2Y),
        ("credit_spread_ig", BASE_SPREAD_IG),
        ("credit_spread_hy", BASE_SPREAD_HY),
        ("portfolio_duration", 6.5),
        ("portfolio_convexity", 0.45),
        ("ig_allocation", 0.65),
        ("hy_allocation", 0.15),
        ("gov_allocation", 0.20),
        ("portfolio_value", 100.0),
    ])
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// The model function. Unknown input keys are ignored.
pub fn evaluate(inputs: &InputSet) -> Result<OutputSet, RunnerError> {
    let pv = require(inputs, "portfolio_value")?;
    let dur = require(inputs, "portfolio_duration")?;
    let cvx = require(inputs, "portfolio_convexity")?;
    let ig_alloc = require(inputs, "ig_allocation")?;
    let hy_alloc = require(inputs, "hy_allocation")?;
    let gov_alloc = require(inputs, "gov_allocation")?;
    let y10_pct = require(inputs, "yield_10y")?;
    let y2_pct = require(inputs, "yield_2y")?;
    let cs_ig = require(inputs, "credit_spread_ig")? / 100.0;
    let cs_hy = require(inputs, "credit_spread_hy")? / 100.0;

    if pv == 0.0 {
        return Err(RunnerError::ModelExecution(
            "portfolio_value must be non-zero".to_string(),
        ));
    }

    let y10 = y10_pct / 100.0;
    let curve_slope_bps = (y10_pct - y2_pct) * 100.0;

    let blended_yield = gov_alloc * y10 + ig_alloc * (y10 + cs_ig) + hy_alloc * (y10 + cs_hy);

    // £k per bp
    let dv01 = pv * dur / 10_000.0;

    let dy = y10 - BASE_YIELD_10Y / 100.0;
    let pnl_rates = (-dur * dy + 0.5 * cvx * dy * dy) * pv;

    let pnl_credit = -(cs_ig - BASE_SPREAD_IG / 100.0) * dur * ig_alloc * pv
        - (cs_hy - BASE_SPREAD_HY / 100.0) * dur * hy_alloc * pv;

    let pnl_total = pnl_rates + pnl_credit;
    let credit_alloc = ig_alloc + hy_alloc;
    let spread_duration = credit_alloc * dur;
    let credit_dv01 = spread_duration * credit_alloc * pv / 10_000.0;

    Ok(OutputSet::from([
        ("portfolio_nav", round_to(pv + pnl_total, 4)),
        ("pnl_total", round_to(pnl_total, 4)),
        ("pnl_rates", round_to(pnl_rates, 4)),
        ("pnl_credit", round_to(pnl_credit, 4)),
        ("dv01", round_to(dv01, 4)),
        ("spread_duration", round_to(spread_duration, 4)),
        ("credit_dv01", round_to(credit_dv01, 6)),
        ("blended_yield_pct", round_to(blended_yield * 100.0, 4)),
        ("curve_slope_bps", round_to(curve_slope_bps, 1)),
        ("portfolio_return_pct", round_to(pnl_total / pv * 100.0, 4)),
    ]))
}

pub fn scenarios() -> Vec<ScenarioDefinition> {
    vec![
        ScenarioDefinition::new(
            "base_case",
            "Current market conditions, no shocks applied.",
            "Baseline against which all stress scenarios are measured.",
            InputSet::new(),
        ),
        ScenarioDefinition::new(
            "rates_shock_up",
            "Parallel shift up in rates by 100bps across the curve.",
            "Tests portfolio sensitivity to a rapid central bank tightening cycle. \
             Historically relevant: Fed hiking cycles of 2004-2006 and 2022-2023.",
            InputSet::from([
                ("yield_10y", BASE_YIELD_10Y + 1.0),
                ("yield_2y", BASE_YIELD_2Y + 1.0),
            ]),
        ),
        ScenarioDefinition::new(
            "rates_shock_down",
            "Parallel shift down in rates by 100bps: flight to safety.",
            "Models a risk-off flight to quality where government bond yields fall sharply. \
             Relevant during recessions, geopolitical crises, or financial system stress.",
            InputSet::from([
                ("yield_10y", BASE_YIELD_10Y - 1.0),
                ("yield_2y", BASE_YIELD_2Y - 1.0),
            ]),
        ),
        ScenarioDefinition::new(
            "credit_stress",
            "IG spreads widen to 250bps; HY spreads widen to 700bps.",
            "Models a credit market dislocation consistent with a moderate recession. \
             IG at 250bps and HY at 700bps were observed during the 2008-2009 GFC.",
            InputSet::from([("credit_spread_ig", 2.50), ("credit_spread_hy", 7.00)]),
        ),
        ScenarioDefinition::new(
            "stagflation",
            "Rates rise 150bps and credit spreads widen simultaneously.",
            "The worst of both worlds for fixed income: duration losses from rising rates \
             compounded by credit losses from spread widening. Stylised 1970s-style stagflation.",
            InputSet::from([
                ("yield_10y", BASE_YIELD_10Y + 1.5),
                ("yield_2y", BASE_YIELD_2Y + 1.5),
                ("credit_spread_ig", 2.00),
                ("credit_spread_hy", 5.50),
            ]),
        ),
    ]
}

pub fn schema() -> ModelSchema {
    ModelSchema {
        name: "Bond Portfolio Risk Model (Demo)".to_string(),
        description: "A simplified fixed-income portfolio risk model that computes \
            mark-to-market P&L, duration risk (DV01), spread risk (credit DV01), and blended \
            yield for a mixed government / IG / HY bond portfolio."
            .to_string(),
        inputs: vec![
            InputField::new("yield_10y", "rates", "%", "10-year government benchmark yield.")
                .with_typical_range(0.5, 8.0),
            InputField::new(
                "yield_2y",
                "rates",
                "%",
                "2-year government yield. The spread between 2y and 10y defines the shape of \
                 the yield curve; an inverted curve (2y > 10y) is a classic recession indicator.",
            )
            .with_typical_range(0.0, 8.0),
            InputField::new(
                "credit_spread_ig",
                "credit",
                "%",
                "Investment-grade corporate bond spread over the government benchmark. \
                 Widens during market stress; tightens during risk-on periods.",
            )
            .with_typical_range(0.5, 4.0),
            InputField::new(
                "credit_spread_hy",
                "credit",
                "%",
                "High-yield corporate bond spread over the government benchmark. More volatile \
                 than IG spreads; highly sensitive to recession risk and liquidity conditions.",
            )
            .with_typical_range(2.0, 15.0),
            InputField::new(
                "portfolio_duration",
                "portfolio",
                "years",
                "Modified duration of the overall portfolio. A duration of 6.5 means a 1% \
                 rate rise costs approximately 6.5% of portfolio value.",
            )
            .with_typical_range(1.0, 15.0),
            InputField::new(
                "portfolio_convexity",
                "portfolio",
                "",
                "Portfolio convexity. Second-order correction to the duration approximation.",
            )
            .with_typical_range(0.0, 2.0),
            InputField::new(
                "ig_allocation",
                "portfolio",
                "fraction",
                "Fraction of portfolio allocated to IG corporate bonds (0-1).",
            )
            .with_typical_range(0.0, 1.0),
            InputField::new(
                "hy_allocation",
                "portfolio",
                "fraction",
                "Fraction of portfolio allocated to HY corporate bonds (0-1). Higher allocation \
                 increases credit spread sensitivity and default risk.",
            )
            .with_typical_range(0.0, 0.5),
            InputField::new(
                "gov_allocation",
                "portfolio",
                "fraction",
                "Fraction of portfolio allocated to government bonds (0-1).",
            )
            .with_typical_range(0.0, 1.0),
            InputField::new(
                "portfolio_value",
                "portfolio",
                "£m",
                "Portfolio notional value at the start of the period.",
            ),
        ],
        outputs: vec![
            OutputField::new(
                "portfolio_nav",
                "£m",
                "Portfolio net asset value after marking to market.",
                "The current fair value. Falls when rates rise or spreads widen; rises in \
                 flight-to-quality scenarios.",
            ),
            OutputField::new(
                "pnl_total",
                "£m",
                "Total mark-to-market P&L relative to the base case.",
                "Positive means the portfolio gained value. Sum of rate-driven and \
                 spread-driven components.",
            )
            .with_thresholds(0.0, -5.0),
            OutputField::new(
                "pnl_rates",
                "£m",
                "P&L from the move in the 10-year yield.",
                "Duration loss with a convexity offset. Negative when yields rise.",
            ),
            OutputField::new(
                "pnl_credit",
                "£m",
                "P&L from IG and HY spread moves.",
                "Negative when spreads widen. Scales with credit allocation and duration.",
            ),
            OutputField::new(
                "dv01",
                "£k per bp",
                "Value of one basis point: rate sensitivity.",
                "How much the portfolio gains or loses for each 1bp move in rates. A DV01 of \
                 £65k means a 100bp rate rise costs about £6.5m.",
            ),
            OutputField::new(
                "spread_duration",
                "years",
                "Spread duration of credit positions.",
                "Higher spread duration means greater sensitivity to credit spread widening.",
            ),
            OutputField::new(
                "credit_dv01",
                "£m per bp",
                "Value lost per 1bp of credit spread widening.",
                "Credit analogue of DV01, weighted by credit allocation.",
            ),
            OutputField::new(
                "blended_yield_pct",
                "%",
                "Weighted average yield across all portfolio holdings.",
                "The expected return if held to maturity with no defaults. Higher yield \
                 compensates for more credit risk.",
            ),
            OutputField::new(
                "curve_slope_bps",
                "bps",
                "10y minus 2y government yield.",
                "Negative values indicate an inverted curve.",
            ),
            OutputField::new(
                "portfolio_return_pct",
                "%",
                "Total P&L expressed as a percentage of starting NAV.",
                "Normalised return, useful for comparing stress severity across scenarios \
                 regardless of portfolio size.",
            )
            .with_thresholds(0.0, -5.0),
        ],
        assumptions: vec![
            "Duration and convexity are fixed parameters; they do not reprice dynamically.".to_string(),
            "Credit P&L uses a duration-weighted spread DV01 approximation.".to_string(),
            "The model does not account for convexity in credit spreads.".to_string(),
            "No default probability or credit migration modelling is included.".to_string(),
            "All P&L is computed relative to the fixed base inputs, not live MTM.".to_string(),
            "Allocations (ig_allocation, hy_allocation, gov_allocation) are expected to sum to 1 but this is not enforced.".to_string(),
        ],
        caveats: vec![
            "This is a demonstration model only, not suitable for production risk management.".to_string(),
            "Real portfolios require full position-level pricing, not a duration approximation.".to_string(),
            "Replace the base inputs with live market data before real use.".to_string(),
        ],
    }
}

pub fn build_repository() -> Result<InMemoryModelRepository, RepositoryError> {
    InMemoryModelRepository::new(schema(), base_inputs(), scenarios())
}

pub fn build_runner() -> FunctionalScenarioRunner {
    FunctionalScenarioRunner::new(evaluate)
}
