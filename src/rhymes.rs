// src/rhymes.rs
// Traditional calls announced alongside each number.

use crate::defs::{FIRSTNUMBER, LASTNUMBER, Number, TOTALNUMBERS};

pub const RHYMES: [&str; TOTALNUMBERS] = [
    "Kelly's eye",
    "One little duck",
    "Cup of tea",
    "Knock at the door",
    "Man alive",
    "Half a dozen",
    "Lucky seven",
    "Garden gate",
    "Doctor's orders",
    "Uncle Ben",
    "Legs eleven",
    "One dozen",
    "Unlucky for some",
    "Valentine's day",
    "Young and keen",
    "Sweet sixteen",
    "Dancing queen",
    "Coming of age",
    "Goodbye teens",
    "One score",
    "Key of the door",
    "Two little ducks",
    "Thee and me",
    "Two dozen",
    "Duck and dive",
    "Pick and mix",
    "Gateway to heaven",
    "Overweight",
    "Rise and shine",
    "Dirty Gertie",
    "Get up and run",
    "Buckle my shoe",
    "Dirty knee",
    "Ask for more",
    "Jump and jive",
    "Three dozen",
    "More than eleven",
    "Christmas cake",
    "Thirty-nine steps",
    "Naughty forty",
    "Time for fun",
    "Winnie the Pooh",
    "Down on your knees",
    "Droopy drawers",
    "Halfway there",
    "Up to tricks",
    "Four and seven",
    "Four dozen",
    "PC",
    "Half a century",
    "Tweak of the thumb",
    "Deck of cards",
    "Stuck in the tree",
    "Clean the floor",
    "Snakes alive",
    "Was she worth it?",
    "Heinz varieties",
    "Make them wait",
    "Brighton line",
    "Five dozen",
    "Baker's bun",
    "Tickety-boo",
    "Tickle me",
    "Red raw",
    "Old age pension",
    "Clickety click",
    "Stairway to heaven",
    "Saving grace",
    "Either way up",
    "Three score and ten",
    "Bang on the drum",
    "Six dozen",
    "Queen bee",
    "Hit the floor",
    "Strive and strive",
    "Trombones",
    "Sunset strip",
    "Heaven's gate",
    "One more time",
    "Eight and blank",
    "Stop and run",
    "Straight on through",
    "Time for tea",
    "Seven dozen",
    "Staying alive",
    "Between the sticks",
    "Torquay in Devon",
    "Two fat ladies",
    "Nearly there",
    "Top of the shop",
];

/// The rhyme for a board number, `None` outside 1..=90.
pub fn rhyme_for(number: Number) -> Option<&'static str> {
    if !(FIRSTNUMBER..=LASTNUMBER).contains(&number) {
        return None;
    }
    RHYMES.get((number - FIRSTNUMBER) as usize).copied()
}
