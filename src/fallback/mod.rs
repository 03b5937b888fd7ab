// Fallback responder module
// Deterministic canned answers keyed by topic keywords


use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Best-effort `key: value` pairs extracted from retrieved context. Carried
/// as a non-authoritative hint only; it never influences topic selection.
pub type InfoHints = HashMap<String, Vec<String>>;

/// Source tag reported when an answer comes from the canned table.
pub const FALLBACK_SOURCE: &str = "general_knowledge";

struct Topic {
    keywords: &'static [&'static str],
    answer: &'static str,
}

/// Evaluated in order; the first topic whose keyword set intersects the
/// question's word set wins. Ties go to table order, not specificity.
const TOPICS: [Topic; 6] = [
    Topic {
        keywords: &["course", "program", "degree", "b.tech", "m.tech"],
        answer: PROGRAMS_ANSWER,
    },
    Topic {
        keywords: &["fee", "cost", "price", "tuition", "money"],
        answer: FEES_ANSWER,
    },
    Topic {
        keywords: &["hostel", "accommodation", "mess", "room", "living"],
        answer: HOSTELS_ANSWER,
    },
    Topic {
        keywords: &["admission", "admissions", "apply", "entrance", "met", "jee", "gate"],
        answer: ADMISSIONS_ANSWER,
    },
    Topic {
        keywords: &["library", "book", "study", "resource"],
        answer: LIBRARY_ANSWER,
    },
    Topic {
        keywords: &["facility", "campus", "lab", "sports", "cafeteria"],
        answer: FACILITIES_ANSWER,
    },
];

/// Produce a canned answer for the question. Pure and total: always returns
/// non-empty text and never touches the index or embedding provider.
#[inline]
pub fn respond(question: &str, hints: &InfoHints) -> String {
    if !hints.is_empty() {
        debug!("Fallback invoked with {} auxiliary hints", hints.len());
    }

    let words = word_set(question);

    for topic in &TOPICS {
        if topic.keywords.iter().any(|k| words.contains(*k)) {
            return topic.answer.to_string();
        }
    }

    GENERAL_ANSWER.to_string()
}

/// Lowercased words of the text, trimmed of edge punctuation. Interior
/// punctuation survives so tokens like "b.tech" match as written.
pub(crate) fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

const PROGRAMS_ANSWER: &str = "\
Manipal Institute of Technology (MIT) offers a wide range of programs.

Undergraduate Programs (B.Tech):
- Computer Science & Engineering
- Information Technology
- Electronics & Communication Engineering
- Mechanical Engineering
- Civil Engineering
- Electrical & Electronics Engineering
- Aerospace Engineering
- Chemical Engineering

Postgraduate Programs (M.Tech & MBA):
- Various M.Tech specializations in engineering fields
- MBA program

The duration for B.Tech is 4 years and M.Tech is 2 years. Admissions are \
based on MET (Manipal Entrance Test) or JEE Main scores for B.Tech programs. \
For detailed information about specific courses, eligibility criteria, and \
admission requirements, visit the official MIT Manipal website or contact \
the admissions office.";

const FEES_ANSWER: &str = "\
Here's the fee structure at MIT Manipal.

B.Tech Programs:
- Annual tuition: ₹4,00,000 - ₹5,00,000 per year
- Total 4-year cost: ₹16,00,000 - ₹20,00,000

M.Tech Programs:
- Annual tuition: ₹2,00,000 - ₹3,00,000 per year

MBA Program:
- Annual tuition: ₹5,00,000 - ₹7,00,000 per year

Additional Costs:
- Admission fee (one-time): ₹50,000 - ₹1,00,000
- Security deposit (refundable): ₹25,000 - ₹50,000
- Hostel fees: ₹80,000 - ₹1,70,000 per year (depending on accommodation type)
- Medical insurance: ₹5,000 - ₹10,000 per year

Financial Aid:
MIT Manipal offers various scholarships including merit-based scholarships \
(up to 50% fee waiver based on MET/JEE rank), sports quota scholarships, \
need-based financial aid, and alumni scholarships. Education loans and EMI \
options are also available.";

const HOSTELS_ANSWER: &str = "\
MIT Manipal provides comprehensive hostel facilities.

Boys Hostels:
- Non-AC Double Occupancy: ₹80,000 - ₹90,000/year
- AC Double Occupancy: ₹1,20,000 - ₹1,40,000/year
- Non-AC Single Occupancy: ₹1,50,000 - ₹1,70,000/year

Girls Hostels:
- Non-AC Double Occupancy: ₹80,000 - ₹90,000/year
- AC Double Occupancy: ₹1,20,000 - ₹1,40,000/year

Facilities: All hostels include Wi-Fi, common rooms, laundry services, mess \
facilities, and 24/7 security.

Mess Timings:
- Breakfast: 7:00 AM - 9:00 AM
- Lunch: 12:00 PM - 2:00 PM
- Snacks: 4:00 PM - 6:00 PM
- Dinner: 7:00 PM - 9:00 PM

Mess fees are included in the hostel fees, and both vegetarian and \
non-vegetarian options are available.";

const ADMISSIONS_ANSWER: &str = "\
Admission Process for MIT Manipal.

Entrance Exams Accepted:
- MET (Manipal Entrance Test) - conducted by MAHE
- JEE Main - for B.Tech programs
- GATE - for M.Tech programs (minimum 50 percentile)

Application Steps:
1. Register online on the official MIT Manipal website
2. Fill out the application form
3. Pay application fee (₹600 - ₹2,000)
4. Appear for entrance exam (if applicable)
5. Participate in counseling and seat allocation
6. Complete document verification and fee payment

Important Dates:
- Application usually starts: October-November
- Application deadline: March-April
- Exam date: April-May
- Counseling: June-July

Contact:
Admissions Office: +91 820 292 2400
Email: admissions@manipal.edu
Website: https://manipal.edu/mit";

const LIBRARY_ANSWER: &str = "\
The Knowledge Resource Centre (Library) at MIT Manipal is a comprehensive \
facility.

Collection:
- Books: 300,000+
- Journals: 1,500+
- E-books: 50,000+
- Digital databases: Access to IEEE, ACM, Springer, and more

Operating Hours:
- Weekdays: 8:00 AM - 10:00 PM
- Saturday: 9:00 AM - 6:00 PM
- Sunday: 10:00 AM - 6:00 PM

Services:
- Book lending (maximum 5 books for 15 days)
- 24/7 digital library access
- Study room booking
- Research assistance
- Printing and scanning facilities";

const FACILITIES_ANSWER: &str = "\
MIT Manipal offers extensive campus facilities.

Library: Knowledge Resource Centre with 300,000+ books and digital resources.

Laboratories: Multiple well-equipped computer labs, engineering labs, and \
advanced research facilities.

Sports Facilities:
- Indoor: Basketball, Badminton, Table Tennis, Gym, Squash
- Outdoor: Cricket, Football, Tennis, Volleyball, Athletics
- Sports complex with courts, fields, and gymnasium

Cafeterias: Multiple food courts serving Indian, Chinese, Continental, and \
Fast Food (7 AM - 10 PM).

Medical: Campus health center with doctors and 24/7 ambulance service.

Technology: Campus-wide high-speed Wi-Fi available 24/7.

Transportation: Regular bus service within campus and to nearby areas.";

const GENERAL_ANSWER: &str = "\
I'm here to help you with information about MIT Manipal! I can provide \
details about:

- Academic programs (B.Tech, M.Tech, MBA)
- Fee structure and scholarships
- Hostel facilities and accommodation
- Admission process and requirements
- Campus facilities (library, labs, sports, cafeterias)
- Campus life and activities

What specific information would you like to know? Feel free to ask me \
anything about MIT Manipal!";
