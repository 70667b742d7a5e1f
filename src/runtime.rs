// lingo-live/src/runtime.rs

// ============================================================================
// THREADS DE FUNDO DA APLICAÇÃO
// ============================================================================

pub mod hotkeys;
