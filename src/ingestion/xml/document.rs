//! Compendium Document Schema
//!
//! The closed set of element nestings the content-tree builder recognizes:
//!
//! ```text
//! compendium
//! ├── monster
//! │   ├── name, size, type, alignment, ac, hp, speed, str … cha, save, skill,
//! │   │   resist, vulnerable, immune, conditionImmune, senses, passive,
//! │   │   languages, cr, spells, slots, description, environment
//! │   └── trait | action | legendary | reaction
//! │       └── name, text, attack, special
//! └── spell
//!     └── name, classes, level, school, ritual, time, range, components,
//!         duration, text
//! ```
//!
//! Each level is an enum whose nested variants carry `Option<Child>`: `None`
//! means the path stops at that element.

use super::content::ElementPath;

/// Declares a level with only leaf elements.
macro_rules! leaf_elements {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($tag => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ElementPath for $name {
            fn element_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }

            fn inner(&self) -> Option<&dyn ElementPath> {
                None
            }
        }
    };
}

leaf_elements!(
    /// Children of `trait`, `action`, `legendary` and `reaction`.
    TraitElement {
        Name => "name",
        Text => "text",
        Attack => "attack",
        Special => "special",
    }
);

leaf_elements!(
    SpellElement {
        Name => "name",
        Classes => "classes",
        Level => "level",
        School => "school",
        Ritual => "ritual",
        Time => "time",
        Range => "range",
        Components => "components",
        Duration => "duration",
        Text => "text",
    }
);

leaf_elements!(
    /// Monster children that hold plain text.
    MonsterField {
        Name => "name",
        Size => "size",
        Type => "type",
        Alignment => "alignment",
        Ac => "ac",
        Hp => "hp",
        Speed => "speed",
        Str => "str",
        Dex => "dex",
        Con => "con",
        Int => "int",
        Wis => "wis",
        Cha => "cha",
        Save => "save",
        Skill => "skill",
        Resist => "resist",
        Vulnerable => "vulnerable",
        Immune => "immune",
        ConditionImmune => "conditionImmune",
        Senses => "senses",
        Passive => "passive",
        Languages => "languages",
        Cr => "cr",
        Spells => "spells",
        Slots => "slots",
        Description => "description",
        Environment => "environment",
    }
);

/// Kinds of named entries listed in a monster record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Trait,
    Action,
    Legendary,
    Reaction,
}

impl EntryKind {
    fn tag(&self) -> &'static str {
        match self {
            Self::Trait => "trait",
            Self::Action => "action",
            Self::Legendary => "legendary",
            Self::Reaction => "reaction",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "trait" => Some(Self::Trait),
            "action" => Some(Self::Action),
            "legendary" => Some(Self::Legendary),
            "reaction" => Some(Self::Reaction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterElement {
    Field(MonsterField),
    Entry(EntryKind, Option<TraitElement>),
}

impl MonsterElement {
    pub fn from_name(name: &str) -> Option<Self> {
        MonsterField::from_name(name)
            .map(Self::Field)
            .or_else(|| EntryKind::from_name(name).map(|kind| Self::Entry(kind, None)))
    }

    fn child(&self, name: &str) -> Option<Self> {
        match self {
            Self::Entry(kind, None) => TraitElement::from_name(name).map(|t| Self::Entry(*kind, Some(t))),
            _ => None,
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            Self::Entry(kind, Some(_)) => Some(Self::Entry(*kind, None)),
            _ => None,
        }
    }
}

impl ElementPath for MonsterElement {
    fn element_name(&self) -> &'static str {
        match self {
            Self::Field(field) => field.element_name(),
            Self::Entry(kind, _) => kind.tag(),
        }
    }

    fn inner(&self) -> Option<&dyn ElementPath> {
        match self {
            Self::Entry(_, Some(t)) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompendiumElement {
    Monster(Option<MonsterElement>),
    Spell(Option<SpellElement>),
}

impl CompendiumElement {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "monster" => Some(Self::Monster(None)),
            "spell" => Some(Self::Spell(None)),
            _ => None,
        }
    }

    fn child(&self, name: &str) -> Option<Self> {
        match self {
            Self::Monster(None) => MonsterElement::from_name(name).map(|m| Self::Monster(Some(m))),
            Self::Monster(Some(m)) => m.child(name).map(|m| Self::Monster(Some(m))),
            Self::Spell(None) => SpellElement::from_name(name).map(|s| Self::Spell(Some(s))),
            Self::Spell(Some(_)) => None,
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            Self::Monster(Some(m)) => Some(Self::Monster(m.parent())),
            Self::Spell(Some(_)) => Some(Self::Spell(None)),
            Self::Monster(None) | Self::Spell(None) => None,
        }
    }
}

impl ElementPath for CompendiumElement {
    fn element_name(&self) -> &'static str {
        match self {
            Self::Monster(_) => "monster",
            Self::Spell(_) => "spell",
        }
    }

    fn inner(&self) -> Option<&dyn ElementPath> {
        match self {
            Self::Monster(Some(m)) => Some(m),
            Self::Spell(Some(s)) => Some(s),
            _ => None,
        }
    }
}

/// A full path from the document container down to the element being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentElement {
    Compendium(Option<CompendiumElement>),
}

impl DocumentElement {
    /// Tag of the single top-level container.
    pub const CONTAINER: &'static str = "compendium";

    pub const MONSTER: DocumentElement = DocumentElement::Compendium(Some(CompendiumElement::Monster(None)));
    pub const SPELL: DocumentElement = DocumentElement::Compendium(Some(CompendiumElement::Spell(None)));

    pub fn container() -> Self {
        Self::Compendium(None)
    }

    /// The path one level deeper, if `name` is an expected child here.
    pub fn child(&self, name: &str) -> Option<Self> {
        match self {
            Self::Compendium(None) => {
                CompendiumElement::from_name(name).map(|c| Self::Compendium(Some(c)))
            }
            Self::Compendium(Some(c)) => c.child(name).map(|c| Self::Compendium(Some(c))),
        }
    }

    /// The path one level up. `None` above the container.
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Compendium(None) => None,
            Self::Compendium(Some(c)) => Some(Self::Compendium(c.parent())),
        }
    }
}

impl ElementPath for DocumentElement {
    fn element_name(&self) -> &'static str {
        Self::CONTAINER
    }

    fn inner(&self) -> Option<&dyn ElementPath> {
        match self {
            Self::Compendium(Some(c)) => Some(c),
            Self::Compendium(None) => None,
        }
    }
}
