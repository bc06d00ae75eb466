//! Data layer: result tables, filename metadata, grouping, smoothing, errors.
//!
//! Architecture:
//! ```text
//!  consultas_*.csv / *mers_distribution.csv / *mers_memory.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → ResultTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ filename  │  name → (variant, K)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  group    │  RunGroup: K → variant → table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐      ┌──────────┐
//!   │  smooth   │ ───▶ │ metrics   │  MAE / MRE, error profiles
//!   └──────────┘      └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  which K values a view shows
//!   └──────────┘
//! ```

pub mod filename;
pub mod filter;
pub mod group;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod smooth;
