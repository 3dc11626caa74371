use std::fmt;

/// Declares a newtype wrapper for a piece of plugin metadata.
macro_rules! metadata_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Eq, PartialEq, Hash)]
        pub struct $name(&'static str);

        impl $name {
            /// Returns the inner string value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                self.0
            }
        }

        impl From<&'static str> for $name {
            fn from(value: &'static str) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0)
            }
        }
    };
}

metadata_type!(Name, "Name of a plugin");
metadata_type!(Author, "Author of a plugin");
metadata_type!(Version, "Version of a plugin");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_displays_inner_value() {
        let name = Name::from("bag_of_holding");

        assert_eq!(name.to_string(), "bag_of_holding");
        assert_eq!(name.as_str(), "bag_of_holding");
    }
}
