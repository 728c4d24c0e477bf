//! Command vocabulary of the spray printer's controller.
//!
//! The controller runs Klipper macros; the exact text below is what those
//! macros expect, down to the comments and line breaks.

/// Dwell after homing and before the return pass (ms).
pub const SERVO_DWELL_MS: u32 = 3000;

/// `VALVES_SET` with every valve of one pass closed.
pub fn idle_valves(pass_width: usize) -> String {
    valves_set(std::iter::repeat(0).take(pass_width))
}

/// `VALVES_SET` listing one decimal value per block.
pub fn valves_set(values: impl IntoIterator<Item = u8>) -> String {
    let mut line = String::from("VALVES_SET VALUES=");
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&value.to_string());
    }
    line.push('\n');
    line
}

/// Travel move along Y, optionally setting the feed rate.
pub fn travel(y: i64, feed_rate: Option<u32>) -> String {
    match feed_rate {
        Some(feed) => format!("G1 Y{} F{}\n", y, feed),
        None => format!("G1 Y{}\n", y),
    }
}

/// Start of a print job.
pub fn print_begin(total_layers: u32, pass_width: usize) -> String {
    format!(
        "SET_PRINT_STATS_INFO TOTAL_LAYER={}\n\
         G28 X Y SET_FIRST_PASS G4 P{} ;wait for servo\n\
         {}\
         VALVES_ENABLE ; change to VALVES_DISABLE to do run without valves active\n",
        total_layers,
        SERVO_DWELL_MS,
        idle_valves(pass_width)
    )
}

/// End of a print job.
pub fn print_end(total_layers: u32) -> String {
    format!("; total layers count = {}\n", total_layers)
}

/// Start of a layer: recoat the bed and arm the forward pass.
///
/// The controller numbers layers from 1.
pub fn layer_begin(layer: i32) -> String {
    let number = i64::from(layer) + 1;
    format!(
        ";Layer{number}\n\
         SET_PRINT_STATS_INFO CURRENT_LAYER={number}\n\
         SET_FIRST_PASS\n\
         Z_ONE_LAYER\n\
         FILL_HOPPER_UNTIL_FULL\n\
         PAUSE_PRINTER ;wait for button press\n\
         DEPOSIT_ONE_LAYER\n"
    )
}

/// Switch from the forward to the return pass at `y`.
pub fn pass_switch(y: i64, pass_width: usize) -> String {
    format!(
        "{}{}{}SET_SECOND_PASS\nG4 P{}\n",
        travel(y, None),
        idle_valves(pass_width),
        travel(y + 1, None),
        SERVO_DWELL_MS
    )
}

/// End of a layer: close the valves at `y` and park at the origin.
pub fn layer_end(y: i64, pass_width: usize) -> String {
    format!(
        "{}{}{}",
        travel(y, None),
        idle_valves(pass_width),
        travel(0, None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_valves() {
        assert_eq!(
            idle_valves(11),
            "VALVES_SET VALUES=0,0,0,0,0,0,0,0,0,0,0\n"
        );
        assert_eq!(idle_valves(1), "VALVES_SET VALUES=0\n");
    }

    #[test]
    fn test_valves_set() {
        assert_eq!(valves_set([16, 255, 0]), "VALVES_SET VALUES=16,255,0\n");
    }

    #[test]
    fn test_travel() {
        assert_eq!(travel(0, Some(8000)), "G1 Y0 F8000\n");
        assert_eq!(travel(117, None), "G1 Y117\n");
    }

    #[test]
    fn test_layer_begin() {
        assert_eq!(
            layer_begin(4),
            ";Layer5\n\
             SET_PRINT_STATS_INFO CURRENT_LAYER=5\n\
             SET_FIRST_PASS\n\
             Z_ONE_LAYER\n\
             FILL_HOPPER_UNTIL_FULL\n\
             PAUSE_PRINTER ;wait for button press\n\
             DEPOSIT_ONE_LAYER\n"
        );
    }

    #[test]
    fn test_pass_switch() {
        assert_eq!(
            pass_switch(1399, 11),
            "G1 Y1399\n\
             VALVES_SET VALUES=0,0,0,0,0,0,0,0,0,0,0\n\
             G1 Y1400\n\
             SET_SECOND_PASS\n\
             G4 P3000\n"
        );
    }

    #[test]
    fn test_layer_end() {
        assert_eq!(
            layer_end(0, 11),
            "G1 Y0\nVALVES_SET VALUES=0,0,0,0,0,0,0,0,0,0,0\nG1 Y0\n"
        );
    }

    #[test]
    fn test_print_begin_and_end() {
        assert_eq!(
            print_begin(120, 11),
            "SET_PRINT_STATS_INFO TOTAL_LAYER=120\n\
             G28 X Y SET_FIRST_PASS G4 P3000 ;wait for servo\n\
             VALVES_SET VALUES=0,0,0,0,0,0,0,0,0,0,0\n\
             VALVES_ENABLE ; change to VALVES_DISABLE to do run without valves active\n"
        );
        assert_eq!(print_end(120), "; total layers count = 120\n");
    }
}
