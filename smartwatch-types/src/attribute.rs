//! The attribute registry - the closed catalog of recognized health attributes.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::Renderer;

/// Tabular attribute code that vendors overload with two meanings.
///
/// The textual attribute name decides which one a line carries, see
/// [`DiskAttribute::from_ata_code`].
pub const CRC_ERRORS_CODE: u32 = 199;

/// Textual name that routes [`CRC_ERRORS_CODE`] to [`DiskAttribute::UdmaCrcErrors`].
pub const UDMA_CRC_ERROR_COUNT_LABEL: &str = "UDMA_CRC_Error_Count";

/// Key/value field holding the spare capacity threshold of a device.
pub const AVAILABLE_SPARE_THRESHOLD: &str = "Available_Spare_Threshold";

/// Immutable registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Canonical name, used as attribute key, baseline key and metric name.
    pub name: &'static str,
    /// Whether discovery freezes this attribute into the baseline.
    pub capture_on_discovery: bool,
    /// How values of this attribute are shown to operators.
    pub renderer: Renderer,
}

/// How the health evaluator treats an attribute.
///
/// Resolved from attribute identity alone; no attribute moves between
/// policies across evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationPolicy {
    /// Critical when the current value exceeds the discovery baseline.
    Default,
    /// Critical when the current value falls below a threshold taken from
    /// the same reading (not from history).
    SpareThreshold,
    /// Critical when the vendor-normalized value reaches its threshold.
    NormalizedCrossCheck,
    /// Critical when the counter grows faster than a fixed rate.
    RateLimited,
    /// Not evaluated here; another check owns the attribute.
    Skipped,
}

macro_rules! registry {
    ($($variant:ident => $name:literal, $capture:literal, $renderer:ident;)+) => {
        /// A recognized disk health attribute.
        ///
        /// Variants are declared in registry order, which is also the order
        /// in which the evaluator reports them.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum DiskAttribute {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $name))]
                $variant,
            )+
        }

        static REGISTRY: &[AttributeDescriptor] = &[
            $(
                AttributeDescriptor {
                    name: $name,
                    capture_on_discovery: $capture,
                    renderer: Renderer::$renderer,
                },
            )+
        ];

        impl DiskAttribute {
            /// Every attribute, in registry order.
            pub const ALL: &'static [DiskAttribute] = &[$(DiskAttribute::$variant,)+];
        }
    };
}

registry! {
    ReallocatedSectors => "Reallocated_Sectors", true, Plain;
    PowerOnHours => "Power_On_Hours", false, Hours;
    SpinRetries => "Spin_Retries", true, Plain;
    PowerCycles => "Power_Cycles", false, Plain;
    EndToEndErrors => "End-to-End_Errors", true, Plain;
    UncorrectableErrors => "Uncorrectable_Errors", true, Plain;
    CommandTimeoutCounter => "Command_Timeout_Counter", true, Plain;
    Temperature => "Temperature", false, Plain;
    ReallocatedEvents => "Reallocated_Events", true, Plain;
    PendingSectors => "Pending_Sectors", true, Plain;
    UdmaCrcErrors => "UDMA_CRC_Errors", true, Plain;
    CrcErrors => "CRC_Errors", true, Plain;
    CriticalWarning => "Critical_Warning", true, Plain;
    MediaAndDataIntegrityErrors => "Media_and_Data_Integrity_Errors", true, Plain;
    AvailableSpare => "Available_Spare", false, Percent;
    PercentageUsed => "Percentage_Used", false, Percent;
    ErrorInformationLogEntries => "Error_Information_Log_Entries", false, Plain;
    DataUnitsRead => "Data_Units_Read", false, Bytes;
    DataUnitsWritten => "Data_Units_Written", false, Bytes;
}

impl DiskAttribute {
    /// The registry entry for this attribute.
    pub fn descriptor(self) -> &'static AttributeDescriptor {
        &REGISTRY[self as usize]
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Whether discovery captures this attribute as a baseline value.
    pub fn capture_on_discovery(self) -> bool {
        self.descriptor().capture_on_discovery
    }

    /// Render a value the way operators expect to read it.
    pub fn render(self, value: i64) -> String {
        self.descriptor().renderer.render(value)
    }

    /// Look an attribute up by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    /// Look an attribute up by tabular ("ATA") attribute code.
    ///
    /// Code 199 is shared by two attributes: a line whose textual name is
    /// `UDMA_CRC_Error_Count` carries [`DiskAttribute::UdmaCrcErrors`], any
    /// other name carries [`DiskAttribute::CrcErrors`]. Codes without a
    /// registry mapping return `None`.
    pub fn from_ata_code(code: u32, label: &str) -> Option<Self> {
        let attribute = match code {
            5 => Self::ReallocatedSectors,
            9 => Self::PowerOnHours,
            10 => Self::SpinRetries,
            12 => Self::PowerCycles,
            184 => Self::EndToEndErrors,
            187 => Self::UncorrectableErrors,
            188 => Self::CommandTimeoutCounter,
            194 => Self::Temperature,
            196 => Self::ReallocatedEvents,
            197 => Self::PendingSectors,
            CRC_ERRORS_CODE if label == UDMA_CRC_ERROR_COUNT_LABEL => Self::UdmaCrcErrors,
            CRC_ERRORS_CODE => Self::CrcErrors,
            _ => return None,
        };
        Some(attribute)
    }

    /// The evaluation policy for this attribute.
    pub fn policy(self) -> EvaluationPolicy {
        match self {
            Self::Temperature => EvaluationPolicy::Skipped,
            Self::AvailableSpare => EvaluationPolicy::SpareThreshold,
            Self::ReallocatedEvents => EvaluationPolicy::NormalizedCrossCheck,
            Self::CommandTimeoutCounter => EvaluationPolicy::RateLimited,
            _ => EvaluationPolicy::Default,
        }
    }

    /// Human-friendly label.
    ///
    /// The canonical name is split on its first underscore; the remainder
    /// is lower-cased with underscores turned into spaces. Upper-case
    /// abbreviations and "Powered on" can't be derived that way.
    pub fn label(self) -> Cow<'static, str> {
        match self {
            Self::CrcErrors => Cow::Borrowed("CRC errors"),
            Self::UdmaCrcErrors => Cow::Borrowed("UDMA CRC errors"),
            Self::PowerOnHours => Cow::Borrowed("Powered on"),
            _ => Cow::Owned(mechanical_label(self.name())),
        }
    }
}

impl core::fmt::Display for DiskAttribute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

fn mechanical_label(name: &str) -> String {
    match name.split_once('_') {
        Some((first, rest)) => {
            let mut label = String::with_capacity(name.len());
            label.push_str(first);
            label.push(' ');
            label.push_str(&rest.to_lowercase().replace('_', " "));
            label
        }
        None => String::from(name),
    }
}
