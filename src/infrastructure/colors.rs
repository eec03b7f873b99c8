macro_rules! const_color {
    ($name:ident, $value:expr) => {
        paste::paste! {
            pub const $name: u32 = $value;

            pub fn [<$name:lower>]() -> poise::serenity_prelude::Colour {
                poise::serenity_prelude::Colour::new($name)
            }
        }
    };
    ($name:ident, $r:expr, $g:expr, $b:expr) => {
        paste::paste! {
            pub const $name: u32 = ($r as u32) << 16 | ($g as u32) << 8 | ($b as u32);

            pub fn [<$name:lower>]() -> poise::serenity_prelude::Colour {
                poise::serenity_prelude::Colour::new($name)
            }
        }
    };
}

// Wordle tile colours.
const_color! { GREEN,       0x538D4E }
const_color! { YELLOW, 181, 159, 59 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_constants_pack_channels() {
        assert_eq!(YELLOW, 0xB59F3B);
        assert_eq!(green().0, 0x538D4E);
    }
}
