//=========================================================================
// Commands
//=========================================================================

/// Discrete player intent, applied to the simulation between frames.
///
/// `Slow`, `Speed` and `Lift` drive the locomotion state machine; `Jump`
/// acts on the character body only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Slow,
    Speed,
    Lift,
    Jump,
}
