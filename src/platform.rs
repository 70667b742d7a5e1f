// lingo-live/src/platform.rs

// ============================================================================
// CÓDIGO ESPECÍFICO DE SISTEMA OPERACIONAL
// ============================================================================

pub mod process;
