//! Account classification enums.
//!
//! Every enumeration here is stored and transmitted as its lowercase display
//! name (e.g. `"hair & makeup"`, `"tamil nadu"`), which is also what clients
//! submit in registration forms. Parsing is case-insensitive and ignores
//! surrounding whitespace.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string does not name a variant of a fixed enumeration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Human-readable name of the enumeration.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical lowercase name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// Which account space a record belongs to.
    ///
    /// Users and vendors share one email namespace; the kind only decides
    /// which profile fields the record carries.
    AccountKind as "account kind" {
        /// A marketplace customer.
        User => "user",
        /// A business offering services on the marketplace.
        Vendor => "vendor",
    }
}

string_enum! {
    /// Role assigned to user accounts. There is deliberately a single value.
    Role as "role" {
        User => "user",
    }
}

string_enum! {
    /// Vendor business categories accepted at registration.
    BusinessCategory as "business category" {
        Caterers => "caterers",
        Bakers => "bakers",
        Djs => "djs",
        Photographers => "photographers",
        Videographers => "videographers",
        HairAndMakeup => "hair & makeup",
        Musicians => "musicians",
    }
}

string_enum! {
    /// Indian states and union territories a vendor can operate in.
    IndianState as "state" {
        AndhraPradesh => "andhra pradesh",
        ArunachalPradesh => "arunachal pradesh",
        Assam => "assam",
        Bihar => "bihar",
        Chhattisgarh => "chhattisgarh",
        Goa => "goa",
        Gujarat => "gujarat",
        Haryana => "haryana",
        HimachalPradesh => "himachal pradesh",
        Jharkhand => "jharkhand",
        Karnataka => "karnataka",
        Kerala => "kerala",
        MadhyaPradesh => "madhya pradesh",
        Maharashtra => "maharashtra",
        Manipur => "manipur",
        Meghalaya => "meghalaya",
        Mizoram => "mizoram",
        Nagaland => "nagaland",
        Odisha => "odisha",
        Punjab => "punjab",
        Rajasthan => "rajasthan",
        Sikkim => "sikkim",
        TamilNadu => "tamil nadu",
        Telangana => "telangana",
        Tripura => "tripura",
        UttarPradesh => "uttar pradesh",
        Uttarakhand => "uttarakhand",
        WestBengal => "west bengal",
        AndamanAndNicobarIslands => "andaman and nicobar islands",
        Chandigarh => "chandigarh",
        DadraNagarHaveliAndDamanDiu => "dadra and nagar haveli and daman and diu",
        Delhi => "delhi",
        Lakshadweep => "lakshadweep",
        Ladakh => "ladakh",
        JammuAndKashmir => "jammu and kashmir",
        Puducherry => "puducherry",
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            " Hair & Makeup ".parse::<BusinessCategory>().unwrap(),
            BusinessCategory::HairAndMakeup
        );
        assert_eq!("TAMIL NADU".parse::<IndianState>().unwrap(), IndianState::TamilNadu);
        assert_eq!("Vendor".parse::<AccountKind>().unwrap(), AccountKind::Vendor);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "florists".parse::<BusinessCategory>().unwrap_err();
        assert_eq!(err.kind, "business category");
        assert_eq!(err.to_string(), "invalid business category: florists");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for state in IndianState::ALL {
            assert_eq!(state.to_string(), state.as_str());
            assert_eq!(state.as_str().parse::<IndianState>().unwrap(), *state);
        }
        assert_eq!(IndianState::ALL.len(), 36);
        assert_eq!(BusinessCategory::ALL.len(), 7);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&BusinessCategory::HairAndMakeup).unwrap();
        assert_eq!(json, "\"hair & makeup\"");

        let state: IndianState = serde_json::from_str("\"Jammu and Kashmir\"").unwrap();
        assert_eq!(state, IndianState::JammuAndKashmir);

        assert!(serde_json::from_str::<AccountKind>("\"admin\"").is_err());
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::User);
    }
}
