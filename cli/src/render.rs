use excavator_core::*;
use std::fmt::Write;

fn tile_glyph(tile: &Tile) -> char {
    use TreasureTier::*;

    if !tile.excavated {
        return '#';
    }
    match (tile.has_trap, tile.treasure) {
        (true, _) => 'X',
        (false, Some(Common)) => 'c',
        (false, Some(Rare)) => 'r',
        (false, Some(Epic)) => 'e',
        (false, Some(Legendary)) => 'L',
        (false, None) => '.',
    }
}

pub(crate) fn grid(grid: &Grid) -> String {
    let mut out = String::from("    0 1 2 3 4 5 6 7\n");
    for (y, row) in grid.rows().enumerate() {
        let _ = write!(out, "{:>2} ", y * usize::from(GRID_WIDTH));
        for tile in row {
            let _ = write!(out, " {}", tile_glyph(tile));
        }
        out.push('\n');
    }
    out
}

fn bar(current: u32, max: u32) -> String {
    const WIDTH: u64 = 20;
    let filled = if max == 0 {
        0
    } else {
        u64::from(current) * WIDTH / u64::from(max)
    };
    let mut out = String::with_capacity(WIDTH as usize);
    for i in 0..WIDTH {
        out.push(if i < filled { '=' } else { ' ' });
    }
    out
}

pub(crate) fn status(snapshot: &ResourceSnapshot, state: SessionState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "health [{}] {}/{}",
        bar(snapshot.health, snapshot.max_health),
        snapshot.health,
        snapshot.max_health
    );
    let _ = writeln!(
        out,
        "energy [{}] {}/{}",
        bar(snapshot.energy, snapshot.max_energy),
        snapshot.energy,
        snapshot.max_energy
    );
    let _ = writeln!(
        out,
        "digs {}  treasures {}  value {}",
        snapshot.excavation_count, snapshot.treasures_found, snapshot.total_value
    );
    match state {
        SessionState::Eliminated => out.push_str("eliminated, reset to play again\n"),
        SessionState::Cleared => out.push_str("grid cleared, reset for a new one\n"),
        SessionState::Fresh | SessionState::Digging => {}
    }
    if snapshot.energy == 0 {
        out.push_str("no energy remaining\n");
    }
    out
}

pub(crate) fn inventory(counts: &TreasureCounts) -> String {
    let mut out = String::new();
    for entry in counts.inventory() {
        let _ = writeln!(
            out,
            "{:<10} x{:<3} {:>4} pts each  {:>6}",
            entry.tier.name(),
            entry.count,
            entry.unit_value,
            entry.subtotal()
        );
    }
    let _ = writeln!(out, "{} total", counts.total());
    out
}

/// Toast-style line for an event, `None` for events not worth interrupting the player for.
pub(crate) fn event(event: &GameEvent) -> Option<String> {
    Some(match *event {
        GameEvent::Blocked(BlockReason::Eliminated) => {
            "Game over! Reset the grid to play again.".to_string()
        }
        GameEvent::Blocked(BlockReason::InsufficientEnergy) => {
            "Not enough energy! Wait for it to regenerate or reset the grid.".to_string()
        }
        GameEvent::TrapTriggered { tile, damage } => {
            format!("TRAP ACTIVATED at tile {tile}! -{damage} health")
        }
        GameEvent::Eliminated => "You have been eliminated!".to_string(),
        GameEvent::TreasureFound { tile, tier, value } => match tier {
            TreasureTier::Legendary => format!("LEGENDARY TREASURE FOUND at tile {tile}! +{value} points"),
            _ => format!("Found {tier} treasure at tile {tile}! +{value} points"),
        },
        GameEvent::Reset => "Grid reset! Good luck, excavator.".to_string(),
        GameEvent::EnergyRegenerated { .. } => return None,
    })
}
