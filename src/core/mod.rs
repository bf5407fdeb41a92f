// Core algorithm exports
pub mod geography;
pub mod matcher;
pub mod normalize;
pub mod qualification;
pub mod scoring;
pub mod territory;

pub use geography::geographic_match;
pub use matcher::{Matcher, RankResult};
pub use normalize::{canonicalize_lead, CanonicalLead};
pub use qualification::qualification_score;
pub use scoring::{match_score, specialization_overlap};
pub use territory::territory_contains;
