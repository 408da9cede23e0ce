//! Static module table and the input-presence policy.
//!
//! The table is built once and never mutated, so it can be shared freely
//! between the presentation thread and dispatch workers.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

/// Closed set of modules known to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// Linear congruence solver.
    Congruence,
    /// Chinese remainder theorem.
    Crt,
    /// Cubic root finder.
    Cubic,
    /// Smallest multiplier making a number divisible.
    Multiplier,
    /// Fraction-free polynomial long division.
    PolyLongDiv,
    /// Trigonometric expression calculator.
    TrigCalc,
    /// Quadratic equation solver.
    Quadratic,
    /// Sturm sequence root counting.
    Sturm,
    /// Entry that opens the algebra workspace; has no computation of its own.
    ProjectActivity,
    /// Algebra workspace backend (expand, simplify, factor, substitute).
    ProjectAlgebra,
}

impl ModuleId {
    /// Every module, in menu order.
    pub const ALL: [ModuleId; 10] = [
        ModuleId::Congruence,
        ModuleId::Crt,
        ModuleId::Cubic,
        ModuleId::Multiplier,
        ModuleId::PolyLongDiv,
        ModuleId::TrigCalc,
        ModuleId::Quadratic,
        ModuleId::Sturm,
        ModuleId::ProjectActivity,
        ModuleId::ProjectAlgebra,
    ];

    /// Stable string id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ModuleId::Congruence => "congruence",
            ModuleId::Crt => "CRT",
            ModuleId::Cubic => "cubic",
            ModuleId::Multiplier => "multiplier",
            ModuleId::PolyLongDiv => "Poly_long_div",
            ModuleId::TrigCalc => "trig_calc",
            ModuleId::Quadratic => "Quad",
            ModuleId::Sturm => "sturm_final",
            ModuleId::ProjectActivity => "PROJ_ACTIVITY",
            ModuleId::ProjectAlgebra => "proj",
        }
    }

    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ModuleId::Congruence => "Congruence",
            ModuleId::Crt => "CRT",
            ModuleId::Cubic => "Cubic",
            ModuleId::Multiplier => "Multiplier",
            ModuleId::PolyLongDiv => "PolyDiv",
            ModuleId::TrigCalc => "Trigonometric Calculator",
            ModuleId::Quadratic => "Quadratic Solver",
            ModuleId::Sturm => "Sturm Sequence",
            ModuleId::ProjectActivity => "Project Activity",
            ModuleId::ProjectAlgebra => "Project Algebra",
        }
    }

    /// Expected input format.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            ModuleId::Congruence => "a b m  (solves ax ≡ b mod m), e.g. 3 5 7",
            ModuleId::Crt => "a1 m1 a2 m2 ... an mn  (x ≡ ai mod mi), e.g. 2 3 3 5 2 7",
            ModuleId::Cubic => "a cubic polynomial, e.g. x^3 - 6x^2 + 11x - 6",
            ModuleId::Multiplier => "n d  (smallest c with d | n·c), e.g. 12 8",
            ModuleId::PolyLongDiv => "numerator, denominator, e.g. x^3 - 6x^2 + 11x - 6, x - 1",
            ModuleId::TrigCalc => "a trigonometric expression, e.g. sin(pi/6) + cos(pi/3)",
            ModuleId::Quadratic => "a quadratic equation, e.g. x² - 5x + 6 = 0",
            ModuleId::Sturm => "polynomial, x1, x2, ...  e.g. x^3 - 3x + 1, -2, 0, 2",
            ModuleId::ProjectActivity => {
                "opens the algebra workspace (expand, simplify, factor, substitute)"
            }
            ModuleId::ProjectAlgebra => "an expression; for substitute use: expr; x=1, y=2",
        }
    }

    /// Whether the module needs a non-empty argument.
    ///
    /// False for the argument-free Sturm module and for the activity entry.
    #[must_use]
    pub const fn requires_argument(self) -> bool {
        !matches!(self, ModuleId::Sturm | ModuleId::ProjectActivity)
    }

    /// Whether the module appears in the selection menu.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        !matches!(self, ModuleId::ProjectAlgebra)
    }

    /// Parse a module id (exact, case-sensitive match).
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == id)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown module: {s}"))
    }
}

impl Serialize for ModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Immutable metadata describing one selectable computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    /// Module id.
    pub id: ModuleId,
    /// Label shown in the selection menu.
    pub display_label: &'static str,
    /// Whether a non-empty argument is required.
    pub requires_argument: bool,
    /// Expected input format.
    pub hint: &'static str,
}

impl ModuleDescriptor {
    const fn of(id: ModuleId) -> Self {
        Self {
            id,
            display_label: id.label(),
            requires_argument: id.requires_argument(),
            hint: id.hint(),
        }
    }
}

/// Fixed mapping from labels and ids to descriptors.
#[derive(Debug)]
pub struct ModuleRegistry {
    descriptors: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    /// Build the registry from the static module list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptors: ModuleId::ALL.into_iter().map(ModuleDescriptor::of).collect(),
        }
    }

    /// Process-wide registry, built on first use.
    pub fn global() -> &'static ModuleRegistry {
        static REGISTRY: OnceLock<ModuleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ModuleRegistry::new)
    }

    /// Exact match against display labels.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&ModuleDescriptor> {
        self.descriptors.iter().find(|d| d.display_label == label)
    }

    /// Exact match against module ids.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.descriptors.iter().find(|d| d.id.as_str() == id)
    }

    /// Label first, then id.
    #[must_use]
    pub fn resolve(&self, label_or_id: &str) -> Option<&ModuleDescriptor> {
        self.lookup(label_or_id).or_else(|| self.by_id(label_or_id))
    }

    /// Argument requirement for a known id; false when the id has no descriptor.
    #[must_use]
    pub fn requires_argument(&self, id: &str) -> bool {
        self.by_id(id).is_some_and(|d| d.requires_argument)
    }

    /// All descriptors, in menu order.
    #[must_use]
    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    /// Descriptors shown in the selection menu.
    pub fn selectable(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.descriptors.iter().filter(|d| d.id.is_selectable())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Input-presence policy shared by the gateway and the presentation layer.
///
/// False when no module is active, for the activity entry, for the
/// argument-free Sturm module and for ids without a descriptor.
#[must_use]
pub fn requires_argument(module_id: Option<&str>) -> bool {
    module_id.is_some_and(|id| ModuleRegistry::global().requires_argument(id))
}
