//! Keyword replies used when the text model is unavailable

use super::ChatRequest;
use crate::recognition::RecognitionResult;

const GREETING: &str = "Hello! I'm GoZero, your sustainable waste management assistant. \
How can I help you with recycling or waste reduction today?";

const THANKS: &str = "You're welcome! Thanks for caring about proper waste management. \
Every small action adds up to a more sustainable planet.";

const PLASTIC: &str = "When recycling plastics, look for the resin number (1-7), usually on \
the bottom of the item. Different types are processed differently. Rinse containers first and \
remove caps or lids, which are often a different plastic. Many grocery stores also collect \
plastic bags for recycling.";

const PAPER: &str = "Paper and cardboard are highly recyclable. Keep them clean and dry, \
flatten boxes to save space, and remove plastic windows, tape and metal fasteners. Paper fibers \
can typically be recycled 5-7 times before they become too short to use.";

const GLASS: &str = "Glass is 100% recyclable and can be recycled endlessly without losing \
quality. Rinse containers, separate by color if your area asks for it, and remove caps and lids. \
Recycling one glass bottle saves enough energy to power a 100-watt bulb for four hours.";

const EWASTE: &str = "Electronic waste contains valuable materials and hazardous components \
that should never go in regular trash. Many retailers run take-back programs, and most areas \
hold e-waste collection events. Back up your data and factory-reset devices before handing \
them in.";

const COMPOST: &str = "Composting food scraps and yard waste cuts methane emissions from \
landfills and produces a valuable soil amendment. Fruit and vegetable scraps, coffee grounds, \
eggshells, yard trimmings and uncoated paper all compost well. Keep meat, dairy, oils and pet \
waste out of home compost.";

const REDUCTION_TIPS: &str = "Some easy ways to cut waste:\n\
• Use reusable bags, bottles and food containers\n\
• Buy in bulk to reduce packaging\n\
• Choose products with minimal or recyclable packaging\n\
• Repair items instead of replacing them\n\
• Donate usable items instead of throwing them away\n\
• Compost food scraps and yard waste\n\
• Switch to paperless bills and statements";

const DEFAULT_REPLY: &str = "I'm here to help with sustainable waste management! Ask me about \
recycling specific materials, reducing waste, or the environmental impact of proper disposal. \
If you've scanned an item, I can give you specific guidance on handling it responsibly.";

/// Lowercased word view of a message for keyword checks
struct Keywords {
    lowered: String,
    words: Vec<String>,
}

impl Keywords {
    fn new(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let words = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '-')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { lowered, words }
    }

    /// Whole-word match, or prefix match for stems ending in '*'
    fn has(&self, keyword: &str) -> bool {
        match keyword.strip_suffix('*') {
            Some(stem) => self.words.iter().any(|w| w.starts_with(stem)),
            None => self.words.iter().any(|w| w == keyword),
        }
    }

    fn any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has(k))
    }

    fn phrase(&self, phrase: &str) -> bool {
        self.lowered.contains(phrase)
    }
}

/// Produce a reply from keyword rules; context-specific rules come first
pub fn reply(request: &ChatRequest) -> String {
    let keywords = Keywords::new(&request.message);

    if let Some(item) = &request.scan_context {
        if let Some(message) = scan_context_reply(&keywords, item) {
            return message;
        }
    }

    general_reply(&keywords).to_string()
}

fn scan_context_reply(keywords: &Keywords, item: &RecognitionResult) -> Option<String> {
    if keywords.has("how") && keywords.any(&["recycl*", "dispos*", "throw"]) {
        return Some(format!(
            "To properly dispose of your {}, follow these steps:\n\n{}\n\n\
             Doing this correctly helps reduce waste and protect the environment!",
            item.item_name, item.disposal_instructions
        ));
    }

    if keywords.any(&["impact", "environment*", "benefit*"]) {
        let impact = &item.environmental_impact;
        return Some(format!(
            "Recycling your {} has real environmental benefits! Disposing of it properly saves \
             about {}kg of CO2, {} liters of water and {}kWh of energy.\n\n{}",
            item.item_name,
            impact.co2_saved_kg,
            impact.water_saved_l,
            impact.energy_saved_kwh,
            impact.description
        ));
    }

    if keywords.has("reuse*") || keywords.phrase("use again") || keywords.phrase("use it again") {
        return Some(if item.reusable {
            format!(
                "Good news! Your {} is reusable. Before disposing of it, consider cleaning it \
                 and giving it a new purpose. That extends its life before it is recycled.",
                item.item_name
            )
        } else {
            format!(
                "Your {} isn't a good candidate for reuse. The best option is to dispose of it \
                 properly: {}",
                item.item_name, item.disposal_instructions
            )
        });
    }

    None
}

fn general_reply(keywords: &Keywords) -> &'static str {
    if keywords.any(&["hello", "hi", "hey"]) {
        GREETING
    } else if keywords.has("thank*") {
        THANKS
    } else if keywords.has("plastic*") {
        PLASTIC
    } else if keywords.any(&["paper*", "cardboard*"]) {
        PAPER
    } else if keywords.has("glass*") {
        GLASS
    } else if keywords.any(&["electronic*", "e-waste", "ewaste", "phone*", "computer*", "laptop*"]) {
        EWASTE
    } else if keywords.any(&["compost*", "organic*"]) || keywords.phrase("food waste") {
        COMPOST
    } else if keywords.any(&["reduce", "reuse*", "tips", "tip"]) {
        REDUCTION_TIPS
    } else {
        DEFAULT_REPLY
    }
}
