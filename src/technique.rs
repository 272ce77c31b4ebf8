//! Technique and weapon identifiers selectable by the consumer.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fencing techniques with an ideal-pose template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Technique {
    #[default]
    Engarde,
    Lunge,
    Fleeche,
    DisengageAttack,
    #[serde(rename = "PARRY_4")]
    Parry4,
    #[serde(rename = "PARRY_6")]
    Parry6,
    #[serde(rename = "PARRY_8")]
    Parry8,
    CircleParry,
    Riposte,
    CounterRiposte,
    Advance,
    Retreat,
    Balestra,
    BeatAttack,
    Bind,
    Disengage,
    Remise,
}

impl Technique {
    pub const ALL: [Technique; 17] = [
        Technique::Engarde,
        Technique::Lunge,
        Technique::Fleeche,
        Technique::DisengageAttack,
        Technique::Parry4,
        Technique::Parry6,
        Technique::Parry8,
        Technique::CircleParry,
        Technique::Riposte,
        Technique::CounterRiposte,
        Technique::Advance,
        Technique::Retreat,
        Technique::Balestra,
        Technique::BeatAttack,
        Technique::Bind,
        Technique::Disengage,
        Technique::Remise,
    ];

    /// Catalog identifier, e.g. `PARRY_4`
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Technique::Engarde => "ENGARDE",
            Technique::Lunge => "LUNGE",
            Technique::Fleeche => "FLEECHE",
            Technique::DisengageAttack => "DISENGAGE_ATTACK",
            Technique::Parry4 => "PARRY_4",
            Technique::Parry6 => "PARRY_6",
            Technique::Parry8 => "PARRY_8",
            Technique::CircleParry => "CIRCLE_PARRY",
            Technique::Riposte => "RIPOSTE",
            Technique::CounterRiposte => "COUNTER_RIPOSTE",
            Technique::Advance => "ADVANCE",
            Technique::Retreat => "RETREAT",
            Technique::Balestra => "BALESTRA",
            Technique::BeatAttack => "BEAT_ATTACK",
            Technique::Bind => "BIND",
            Technique::Disengage => "DISENGAGE",
            Technique::Remise => "REMISE",
        }
    }

    /// Resolve a loose move name (`lunge`, `parry`, `riposte`, ...) to the
    /// template it is scored against. Unrecognised names fall back to
    /// en garde.
    #[must_use]
    pub fn for_move(name: &str) -> Technique {
        match name.trim().to_ascii_lowercase().as_str() {
            "lunge" => Technique::Lunge,
            "parry" => Technique::Parry4,
            // A riposte starts from the guard it returns to
            "riposte" => Technique::Engarde,
            other => other.parse().unwrap_or_default(),
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Technique {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|technique| technique.id() == wanted)
            .ok_or_else(|| Error::UnknownTechnique(s.to_string()))
    }
}

/// Fencing weapon, which only changes the rules shown alongside feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weapon {
    #[default]
    Foil,
    Epee,
    Sabre,
}

impl Weapon {
    pub const ALL: [Weapon; 3] = [Weapon::Foil, Weapon::Epee, Weapon::Sabre];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Weapon::Foil => "FOIL",
            Weapon::Epee => "EPEE",
            Weapon::Sabre => "SABRE",
        }
    }

    /// Display name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Weapon::Foil => "Foil",
            Weapon::Epee => "Épée",
            Weapon::Sabre => "Sabre",
        }
    }

    /// Valid target area, short form
    #[must_use]
    pub fn target(self) -> &'static str {
        match self {
            Weapon::Foil => "Torso only",
            Weapon::Epee => "Entire body",
            Weapon::Sabre => "Waist up",
        }
    }

    #[must_use]
    pub fn rules(self) -> [&'static str; 3] {
        match self {
            Weapon::Foil => [
                "Target: Torso only (including back, not arms)",
                "Right of way rules apply",
                "Light thrusting weapon",
            ],
            Weapon::Epee => ["Target: Entire body", "First touch scores", "Heavier thrusting weapon"],
            Weapon::Sabre => [
                "Target: Waist up (except hands)",
                "Right of way rules apply",
                "Cutting and thrusting weapon",
            ],
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weapon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "foil" => Ok(Weapon::Foil),
            "epee" | "épée" => Ok(Weapon::Epee),
            "sabre" | "saber" => Ok(Weapon::Sabre),
            _ => Err(Error::UnknownWeapon(s.to_string())),
        }
    }
}
