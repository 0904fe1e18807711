//! Compiled-in sign choreography
//!
//! Angles are Euler deltas in degrees against the humanoid rig. Every clip
//! brings the joints it moves back to rest.

use crate::gesture::GestureClip;
use kineia_core::Joint;

/// Greeting: raise the right arm, bend the forearm, release
pub fn saludo() -> GestureClip {
    GestureClip::builder("saludo")
        .rotate(Joint::UpperArmR, 90.0, 0.0, 0.0)
        .rotate(Joint::ForearmR, 64.0, 0.0, 0.0)
        .pause_ms(500)
        .rotate(Joint::ForearmR, -64.0, 0.0, 0.0)
        .pause_ms(500)
        .rotate(Joint::UpperArmR, -90.0, 0.0, 0.0)
        .finish()
}

/// Fingerspelled B
pub fn letter_b() -> GestureClip {
    GestureClip::builder("b")
        .rotate(Joint::UpperArmR, 90.0, 0.0, 0.0)
        .rotate(Joint::ForearmR, 0.0, 0.0, 64.0)
        .pause_ms(800)
        .rotate(Joint::ForearmR, 0.0, 0.0, -64.0)
        .rotate(Joint::UpperArmR, -90.0, 0.0, 0.0)
        .finish()
}

/// Fingerspelled E: forearm up, palm out, fingers and thumb curled
pub fn letter_e() -> GestureClip {
    GestureClip::builder("e")
        .rotate(Joint::ForearmR, 125.0, 0.0, 0.0)
        .rotate(Joint::HandR, 0.0, -100.0, 0.0)
        .rotate(Joint::MiddleR, 90.0, 0.0, 0.0)
        .rotate(Joint::RingR, 90.0, 0.0, 0.0)
        .rotate(Joint::IndexR, 90.0, 0.0, 0.0)
        .rotate(Joint::PinkyR, 90.0, 0.0, 0.0)
        .rotate(Joint::ThumbR, 0.0, -90.0, 0.0)
        .pause_ms(800)
        .rotate(Joint::ThumbR, 0.0, 90.0, 0.0)
        .rotate(Joint::PinkyR, -90.0, 0.0, 0.0)
        .rotate(Joint::IndexR, -90.0, 0.0, 0.0)
        .rotate(Joint::RingR, -90.0, 0.0, 0.0)
        .rotate(Joint::MiddleR, -90.0, 0.0, 0.0)
        .rotate(Joint::HandR, 0.0, 100.0, 0.0)
        .rotate(Joint::ForearmR, -125.0, 0.0, 0.0)
        .finish()
}

/// "How": both forearms in, hands roll out and back
pub fn how() -> GestureClip {
    GestureClip::builder("how")
        .rotate(Joint::UpperArmR, 0.0, -30.0, 0.0)
        .rotate(Joint::UpperArmL, 0.0, 30.0, 0.0)
        .rotate(Joint::ForearmL, 0.0, 0.0, -120.0)
        .rotate(Joint::ForearmR, 0.0, 0.0, 120.0)
        .rotate(Joint::HandR, 0.0, -130.0, 0.0)
        .rotate(Joint::HandL, 0.0, 130.0, 0.0)
        .pause_ms(800)
        .rotate(Joint::HandL, 0.0, -130.0, 0.0)
        .rotate(Joint::HandR, 0.0, 130.0, 0.0)
        .pause_ms(800)
        .rotate(Joint::ForearmR, 0.0, 0.0, -120.0)
        .rotate(Joint::ForearmL, 0.0, 0.0, 120.0)
        .rotate(Joint::UpperArmR, 0.0, 30.0, 0.0)
        .rotate(Joint::UpperArmL, 0.0, -30.0, 0.0)
        .finish()
}

/// "You": point with the index finger
pub fn you() -> GestureClip {
    GestureClip::builder("you")
        .rotate(Joint::ForearmR, 90.0, 0.0, 0.0)
        .rotate(Joint::MiddleR, 130.0, 0.0, 0.0)
        .rotate(Joint::RingR, 130.0, 0.0, 0.0)
        .rotate(Joint::PinkyR, 130.0, 0.0, 0.0)
        .pause_ms(800)
        .rotate(Joint::PinkyR, -130.0, 0.0, 0.0)
        .rotate(Joint::RingR, -130.0, 0.0, 0.0)
        .rotate(Joint::MiddleR, -130.0, 0.0, 0.0)
        .rotate(Joint::ForearmR, -90.0, 0.0, 0.0)
        .finish()
}

/// "Feel": middle finger bent, brushed twice against the chest
pub fn feel() -> GestureClip {
    GestureClip::builder("feel")
        .rotate(Joint::ForearmR, 90.0, 0.0, 0.0)
        .pause_ms(500)
        .rotate(Joint::ForearmR, 0.0, -30.0, 0.0)
        .rotate(Joint::MiddleR, 135.0, 0.0, 0.0)
        .pause_ms(200)
        .rotate(Joint::ForearmR, 20.0, 0.0, 0.0)
        .pause_ms(200)
        .rotate(Joint::ForearmR, -20.0, 0.0, 0.0)
        .pause_ms(200)
        .rotate(Joint::ForearmR, 20.0, 0.0, 0.0)
        .pause_ms(200)
        .rotate(Joint::ForearmR, -20.0, 0.0, 0.0)
        .pause_ms(800)
        .rotate(Joint::MiddleR, -135.0, 0.0, 0.0)
        .rotate(Joint::ForearmR, 0.0, 30.0, 0.0)
        .pause_ms(500)
        .rotate(Joint::ForearmR, -90.0, 0.0, 0.0)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn all() -> Vec<GestureClip> {
        vec![saludo(), letter_b(), letter_e(), how(), you(), feel()]
    }

    #[test]
    fn test_signs_are_valid_clips() {
        for clip in all() {
            assert!(clip.validate().is_ok(), "{} failed validation", clip.name());
        }
    }

    #[test]
    fn test_signs_return_to_rest() {
        for clip in all() {
            assert!(clip.returns_to_rest(), "{} leaves a joint rotated", clip.name());
        }
    }

    #[test]
    fn test_sign_pause_totals() {
        assert_eq!(saludo().total_pause(), Duration::from_millis(1000));
        assert_eq!(letter_b().total_pause(), Duration::from_millis(800));
        assert_eq!(letter_e().total_pause(), Duration::from_millis(800));
        assert_eq!(how().total_pause(), Duration::from_millis(1600));
        assert_eq!(you().total_pause(), Duration::from_millis(800));
        assert_eq!(feel().total_pause(), Duration::from_millis(2600));
    }

    #[test]
    fn test_you_leaves_index_extended() {
        assert!(!you().joints().contains(&Joint::IndexR));
    }
}
