//! Macros for declaring state kinds.

/// Generate a `StateKind` enum.
///
/// The enum gets the derives `StateKind` requires and a `name` that
/// returns the variant's identifier.
///
/// # Example
///
/// ```
/// use reflex::core::StateKind;
/// use reflex::state_kind;
///
/// state_kind! {
///     pub enum Behaviour {
///         Idle,
///         Roam,
///         Attack,
///     }
/// }
///
/// assert_eq!(Behaviour::Roam.name(), "Roam");
/// ```
#[macro_export]
macro_rules! state_kind {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKind for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::StateKind;
    use std::collections::HashSet;

    state_kind! {
        enum TestKind {
            Idle,
            Roam,
            Attack,
        }
    }

    #[test]
    fn state_kind_macro_generates_trait() {
        assert_eq!(TestKind::Idle.name(), "Idle");
        assert_eq!(TestKind::Roam.name(), "Roam");
        assert_eq!(TestKind::Attack.name(), "Attack");
    }

    #[test]
    fn state_kind_is_hashable_and_copy() {
        let kind = TestKind::Roam;
        let copy = kind;
        let set: HashSet<TestKind> = [kind, copy, TestKind::Idle].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn state_kind_supports_visibility_and_attributes() {
        state_kind! {
            /// Kinds for a door.
            pub enum DoorKind {
                Closed,
                #[allow(dead_code)]
                Open,
            }
        }

        assert_eq!(DoorKind::Closed.name(), "Closed");
    }
}
