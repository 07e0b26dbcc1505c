//! The five fixed voter identities of the panda election.

use clap::ValueEnum;
use serde::Serialize;

/// Outcome of the final, user-controlled vote: whether the pandas live or die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Live,
    Die,
}

impl Decision {
    /// The form value the site expects in the `survive` field.
    pub fn survive_value(self) -> &'static str {
        match self {
            Decision::Live => "1",
            Decision::Die => "0",
        }
    }
}

/// One of the five voting groups. Each submits exactly one vote per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    pub name: &'static str,
    pub survive: &'static str,
}

/// The fixed roster, in submission order.
///
/// Four votes are predetermined; the final group carries the CLI decision
/// and seals the pandas' fate.
pub fn roster(decision: Decision) -> Vec<Voter> {
    vec![
        Voter {
            name: "bearfoot_bearitone",
            survive: "0",
        },
        Voter {
            name: "bearium_bearon",
            survive: "0",
        },
        Voter {
            name: "stupandas_bamboozle",
            survive: "1",
        },
        Voter {
            name: "bearing_embearass_goosebeary",
            survive: "1",
        },
        Voter {
            name: "beary_pawsitively_forbearance",
            survive: decision.survive_value(),
        },
    ]
}
