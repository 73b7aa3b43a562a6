//! # Extraction Circuit Module
//!
//! Steady-state model of a cascade of mixer-settler stages in counter-current flow.
//!
//! ## Nomenclature
//!
//! | Symbol | Description | Units |
//! |--------|-------------|-------|
//! | `aq` | copper in the aqueous phase | g/L |
//! | `org` | copper in the organic phase | g/L |
//! | `AML` | maximum organic loading at the chosen v/v% | g/L |
//! | `O/A` | organic-to-aqueous volumetric flow ratio | - |
//! | `E` | mixer efficiency | % |
//!
//! ## Isotherm
//!
//! ```text
//! org_eq(aq) = AML * aq / (2.5 + aq)
//! ```
//!
//! ## Stage balance
//!
//! ```text
//! org_out = org_in + E/100 * (org_eq(aq_out) - org_in)
//! aq_out  = aq_in - (org_out - org_in) / (O/A)
//! ```
//!
//! ## Flow arrangement
//!
//! Organic enters stage 0 (stripped organic) and leaves stage N-1 (loaded organic).
//! Aqueous feed enters stage N-1 and leaves stage 0 as raffinate.

pub mod cascade;
mod circuit_tests;
pub mod isotherm;
pub mod stage;
