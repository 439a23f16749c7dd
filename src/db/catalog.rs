//! GymUp muscle-group and equipment ids

const UNKNOWN: &str = "Unknown";

pub fn muscle_name(id: Option<i64>) -> &'static str {
    match id {
        Some(1) => "Neck",
        Some(2) => "Traps",
        Some(3) => "Shoulders",
        Some(4) => "Chest",
        Some(5) => "Back",
        Some(6) => "Biceps",
        Some(7) => "Triceps",
        Some(8) => "Forearms",
        Some(9) => "Core/Abs",
        Some(10) => "Lower Back",
        Some(11) => "Glutes",
        Some(12) => "Hip Flexors",
        Some(13) => "Adductors",
        Some(14) => "Quads",
        Some(15) => "Abductors",
        Some(16) => "Hamstrings",
        Some(17) => "Calves",
        _ => UNKNOWN,
    }
}

pub fn equipment_name(id: Option<i64>) -> &'static str {
    match id {
        Some(1) => "Barbell",
        Some(2) => "Dumbbell",
        Some(3) => "Bodyweight",
        Some(4) => "Machine",
        Some(5) => "Cable",
        Some(6) => "Smith Machine",
        Some(7) => "Kettlebell",
        Some(9) => "Resistance Band",
        Some(10) => "Other",
        _ => UNKNOWN,
    }
}

/// Trimmed name, or "Muscle (Equipment) #id" for built-in exercises stored without one
pub fn display_name(id: i64, name: Option<&str>, muscle: Option<i64>, equipment: Option<i64>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{} ({}) #{}", muscle_name(muscle), equipment_name(equipment), id),
    }
}
