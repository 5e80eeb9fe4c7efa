use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rosu_mods::GameModsLegacy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Collection of game mods.
///
/// Besides the mods known to osu!standard, this also keeps track of the
/// mods exclusive to osu!droid, i.e. Precise, ReallyEasy, and SmallCircle.
///
/// This type can be created through its `From<T>` implementations where `T`
/// can be
/// - `u32` (legacy bits)
/// - [`rosu_mods::GameModsLegacy`]
///
/// or by parsing a string of acronyms (`"HDDT"`) through [`FromStr`] or an
/// osu!droid mod string through [`GameMods::from_droid_str`].
///
/// # Example
///
/// ```
/// use droid_pp::GameMods;
/// use rosu_mods::GameModsLegacy;
///
/// let int = GameMods::from(64 + 8);
/// let legacy = GameMods::from(GameModsLegacy::Hidden | GameModsLegacy::DoubleTime);
/// let acronyms: GameMods = "HDDT".parse().unwrap();
/// let droid = GameMods::from_droid_str("hd").unwrap();
///
/// assert_eq!(int, legacy);
/// assert_eq!(legacy, acronyms);
/// assert_eq!(acronyms, droid);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct GameMods {
    legacy: u32,
    droid: u8,
}

/// Error when parsing [`GameMods`] from a string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseModsError {
    #[error("unknown mod acronym `{0}`")]
    UnknownAcronym(Box<str>),
    #[error("unknown osu!droid mod character `{0}`")]
    UnknownDroidChar(char),
    #[error("mod acronyms must consist of two characters each")]
    OddLength,
}

macro_rules! define_mods {
    (
        $(
            $fn:ident: $field:ident [$bits:expr] $acronym:literal
                $( droid = $droid_char:literal )?
                mult = $mult:literal,
        )*
    ) => {
        impl GameMods {
            $(
                #[doc = concat!("Check whether [`GameMods`] contain `", $acronym, "`.")]
                pub const fn $fn(&self) -> bool {
                    self.$field & ($bits) != 0
                }
            )*

            /// The score multiplier of all mods combined.
            pub fn score_multiplier(&self) -> f64 {
                let mut multiplier = 1.0;

                $(
                    if self.$fn() && !self.implied($acronym) {
                        multiplier *= $mult;
                    }
                )*

                multiplier
            }

            fn insert_acronym(&mut self, acronym: &str) -> Result<(), ParseModsError> {
                match acronym {
                    $( $acronym => self.$field |= $bits, )*
                    "NM" => {}
                    _ => return Err(ParseModsError::UnknownAcronym(Box::from(acronym))),
                }

                Ok(())
            }

            fn insert_droid_char(&mut self, c: char) -> Result<(), ParseModsError> {
                match c {
                    $( $( $droid_char => self.$field |= $bits, )? )*
                    _ => return Err(ParseModsError::UnknownDroidChar(c)),
                }

                Ok(())
            }

            fn fmt_acronyms(&self, f: &mut Formatter<'_>) -> FmtResult {
                let mut empty = true;

                $(
                    if self.$fn() && !self.implied($acronym) {
                        f.write_str($acronym)?;
                        empty = false;
                    }
                )*

                if empty {
                    f.write_str("NM")?;
                }

                Ok(())
            }
        }
    };
}

const PRECISE: u8 = 1 << 0;
const REALLY_EASY: u8 = 1 << 1;
const SMALL_CIRCLE: u8 = 1 << 2;

define_mods! {
    nf: legacy [1 << 0] "NF" droid = 'n' mult = 0.5,
    ez: legacy [1 << 1] "EZ" droid = 'e' mult = 0.5,
    td: legacy [1 << 2] "TD" mult = 1.0,
    hd: legacy [1 << 3] "HD" droid = 'h' mult = 1.06,
    hr: legacy [1 << 4] "HR" droid = 'r' mult = 1.06,
    sd: legacy [1 << 5] "SD" droid = 'u' mult = 1.0,
    pf: legacy [1 << 14] "PF" droid = 'f' mult = 1.0,
    dt: legacy [1 << 6] "DT" droid = 'd' mult = 1.12,
    nc: legacy [1 << 9] "NC" droid = 'c' mult = 1.12,
    ht: legacy [1 << 8] "HT" droid = 't' mult = 0.3,
    fl: legacy [1 << 10] "FL" droid = 'i' mult = 1.12,
    rx: legacy [1 << 7] "RX" droid = 'x' mult = 0.001,
    ap: legacy [1 << 13] "AP" droid = 'p' mult = 0.001,
    so: legacy [1 << 12] "SO" mult = 0.9,
    v2: legacy [1 << 29] "V2" droid = 'v' mult = 1.0,
    pr: droid [PRECISE] "PR" droid = 's' mult = 1.06,
    re: droid [REALLY_EASY] "RE" droid = 'l' mult = 0.4,
    sc: droid [SMALL_CIRCLE] "SC" droid = 'm' mult = 1.06,
}

impl GameMods {
    /// No mods.
    pub const NOMOD: Self = Self {
        legacy: 0,
        droid: 0,
    };

    /// Parse an osu!droid mod string, e.g. `"hr"` for HDHR.
    ///
    /// Everything after a `|`, which osu!droid uses for extra settings such as
    /// a custom speed multiplier, is ignored.
    pub fn from_droid_str(s: &str) -> Result<Self, ParseModsError> {
        let mods_part = s.split('|').next().unwrap_or_default();
        let mut mods = Self::NOMOD;

        for c in mods_part.chars().filter(|c| !c.is_whitespace()) {
            mods.insert_droid_char(c)?;
        }

        Ok(mods)
    }

    /// The legacy representation of the mods.
    ///
    /// osu!droid exclusive mods are not part of it.
    pub fn legacy(&self) -> GameModsLegacy {
        GameModsLegacy::from_bits(self.legacy)
    }

    /// Legacy mod bits.
    pub const fn bits(&self) -> u32 {
        self.legacy
    }

    /// Whether no mod is set at all.
    pub const fn is_empty(&self) -> bool {
        self.legacy == 0 && self.droid == 0
    }

    /// The clock rate of the mods.
    ///
    /// DoubleTime and Nightcore take precedence over HalfTime.
    pub fn clock_rate(&self) -> f64 {
        if self.dt() || self.nc() {
            1.5
        } else if self.ht() {
            0.75
        } else {
            self.legacy().clock_rate()
        }
    }

    /// Multiplier for OD, AR, and HP.
    ///
    /// HardRock takes precedence over Easy.
    pub(crate) const fn od_ar_hp_multiplier(&self) -> f64 {
        if self.hr() {
            1.4
        } else if self.ez() {
            0.5
        } else {
            1.0
        }
    }

    // Nightcore implies DoubleTime
    fn implied(&self, acronym: &str) -> bool {
        acronym == "DT" && self.nc()
    }
}

impl From<u32> for GameMods {
    fn from(bits: u32) -> Self {
        Self {
            legacy: bits,
            droid: 0,
        }
    }
}

impl From<GameModsLegacy> for GameMods {
    fn from(mods: GameModsLegacy) -> Self {
        Self::from(mods.bits())
    }
}

impl FromStr for GameMods {
    type Err = ParseModsError;

    /// Parse a string of concatenated mod acronyms, e.g. `"HDDT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().to_ascii_uppercase().chars().collect();

        if chars.len() % 2 != 0 {
            return Err(ParseModsError::OddLength);
        }

        let mut mods = Self::NOMOD;
        let mut acronym = String::with_capacity(2);

        for pair in chars.chunks_exact(2) {
            acronym.clear();
            acronym.extend(pair);
            mods.insert_acronym(&acronym)?;
        }

        Ok(mods)
    }
}

impl Display for GameMods {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.fmt_acronyms(f)
    }
}

impl Debug for GameMods {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "GameMods({self})")
    }
}

impl Serialize for GameMods {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameMods {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;

        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronyms() {
        let mods: GameMods = "hdhr".parse().unwrap();
        assert!(mods.hd() && mods.hr());
        assert!(!mods.dt());
        assert_eq!(mods.to_string(), "HDHR");

        let mods: GameMods = "NCPR".parse().unwrap();
        assert!(mods.nc() && mods.pr());
        assert_eq!(mods.to_string(), "NCPR");

        assert_eq!("".parse::<GameMods>().unwrap(), GameMods::NOMOD);
        assert_eq!(GameMods::NOMOD.to_string(), "NM");
        assert_eq!("NM".parse::<GameMods>().unwrap(), GameMods::NOMOD);
    }

    #[test]
    fn invalid_acronyms() {
        assert_eq!("HDX".parse::<GameMods>(), Err(ParseModsError::OddLength));
        assert_eq!(
            "HDQQ".parse::<GameMods>(),
            Err(ParseModsError::UnknownAcronym(Box::from("QQ")))
        );
    }

    #[test]
    fn droid_string() {
        let mods = GameMods::from_droid_str("hrsm|x1.25").unwrap();
        assert!(mods.hd() && mods.hr() && mods.pr() && mods.sc());
        assert!(!mods.re());

        assert_eq!(
            GameMods::from_droid_str("hz"),
            Err(ParseModsError::UnknownDroidChar('z'))
        );
    }

    #[test]
    fn legacy_bits() {
        let mods = GameMods::from(8 + 64);
        assert!(mods.hd() && mods.dt());
        assert_eq!(mods.bits(), 72);
        assert_eq!(
            mods.legacy(),
            GameModsLegacy::Hidden | GameModsLegacy::DoubleTime
        );
    }

    #[test]
    fn clock_rate_precedence() {
        assert!((GameMods::from(64 + 256).clock_rate() - 1.5).abs() < f64::EPSILON);
        assert!((GameMods::from(256).clock_rate() - 0.75).abs() < f64::EPSILON);
        assert!((GameMods::NOMOD.clock_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn multipliers() {
        let mods: GameMods = "HDHR".parse().unwrap();
        assert!((mods.score_multiplier() - 1.06 * 1.06).abs() < 1e-12);

        // Legacy NC also sets DT but only counts once
        let mods = GameMods::from(64 + 512);
        assert!((mods.score_multiplier() - 1.12).abs() < 1e-12);
        assert_eq!(mods.to_string(), "NC");
    }

    #[test]
    fn serde_as_acronyms() {
        let mods: GameMods = "HDDTPR".parse().unwrap();
        let json = serde_json::to_string(&mods).unwrap();
        assert_eq!(json, r#""HDDTPR""#);

        let back: GameMods = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mods);
    }
}
