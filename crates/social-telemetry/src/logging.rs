//! Structured logging macros.
//!
//! Every line carries a `component` field so log aggregation can split the
//! consensus engine from the rest of the node without parsing targets.

/// Log an event with a component field.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a social transaction event with hash and type fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $component:expr, $msg:expr, $tx:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            tx_hash = %$tx.hash,
            tx_type = %$tx.tx_type,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a block-level event with height and size fields.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $component:expr, $msg:expr, $height:expr, $tx_count:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            block_height = $height,
            tx_count = $tx_count,
            $($($field)*,)?
            $msg
        )
    };
}
