//! Shared test messages.

/// A customer transfer from BANKBEBB to BANKDEFF routed through BANKUS33.
pub const MT103: &str = "{1:F01BANKBEBBAXXX0000000000}{2:I103BANKDEFFXXXXN}{3:{108:MT103}}{4:\r\n\
:20:REF123\r\n\
:23B:CRED\r\n\
:32A:061014USD100,00\r\n\
:50K:/12345678\r\n\
JOHN DOE\r\n\
:57A:BANKUS33\r\n\
:59A:/87654321\r\n\
BANKGB22\r\n\
:71G:USD5,00\r\n\
-}";

/// The same transfer with an output-format application header.
pub const MT103_OUTPUT_HEADER: &str = "{1:F01BANKBEBBAXXX0000000000}{2:O1031200061014BANKDEFFAXXX22221234560610141201N}{4:\r\n\
:32A:061014USD100,00\r\n\
:57A:BANKUS33\r\n\
-}";

/// Builds the transfer message with another amount and fee.
pub fn mt103_with(amount: &str, fee: &str) -> String {
    MT103
        .replace("USD100,00", &format!("USD{amount}"))
        .replace(":71G:USD5,00", &format!(":71G:USD{fee}"))
}
