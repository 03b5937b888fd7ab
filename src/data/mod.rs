// Data provider module
// Curated topic records: built-in seed content plus on-disk overrides

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Topic names the knowledge base is built from, in build order. A missing
/// topic file simply contributes no chunks.
pub const TOPICS: [&str; 6] = [
    "official_info",
    "courses",
    "hostels",
    "fees",
    "facilities",
    "admissions",
];

/// Supplies one nested key-value record per named topic. Records are read
/// from `<data_dir>/<topic>.json`; `seed` materializes the built-in content
/// for any topic file that does not exist yet, so operators can edit the
/// JSON between rebuilds.
pub struct DataProvider {
    data_dir: PathBuf,
}

impl DataProvider {
    #[inline]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Write the built-in record for every topic whose file is missing.
    /// Existing files are never overwritten.
    #[inline]
    pub fn seed(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;

        for topic in TOPICS {
            let path = self.topic_path(topic);
            if path.exists() {
                debug!("Topic file already present: {}", path.display());
                continue;
            }

            let record = builtin_record(topic);
            let content = serde_json::to_string_pretty(&record)
                .with_context(|| format!("Failed to serialize built-in record '{}'", topic))?;
            fs::write(&path, content)
                .with_context(|| format!("Failed to write topic file: {}", path.display()))?;
            info!("Seeded topic file {}", path.display());
        }

        Ok(())
    }

    /// Load every available topic record in [`TOPICS`] order.
    #[inline]
    pub fn load_all(&self) -> Vec<(String, Value)> {
        let mut records = Vec::new();

        for topic in TOPICS {
            match self.load_topic(topic) {
                Ok(Some(record)) => records.push((topic.to_string(), record)),
                Ok(None) => warn!("Topic '{}' has no data file, skipping", topic),
                Err(e) => warn!("Failed to load topic '{}': {:#}", topic, e),
            }
        }

        records
    }

    /// Load a single topic record, `None` if its file does not exist.
    #[inline]
    pub fn load_topic(&self, topic: &str) -> Result<Option<Value>> {
        let path = self.topic_path(topic);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read topic file: {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse topic file: {}", path.display()))?;

        Ok(Some(record))
    }

    fn topic_path(&self, topic: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", topic))
    }
}

/// Built-in record for a topic. Unknown names yield an empty record, which
/// flattens to zero chunks.
#[inline]
pub fn builtin_record(topic: &str) -> Value {
    match topic {
        "official_info" => json!({
            "institute_info": {
                "name": "Manipal Institute of Technology (MIT)",
                "university": "Manipal Academy of Higher Education (MAHE)",
                "location": "Manipal, Karnataka, India",
                "established": "1957",
                "type": "Private University",
                "accreditation": "NAAC A++ Grade, UGC recognized"
            },
            "programs": [
                {
                    "department": "Computer Science & Engineering",
                    "programs": ["B.Tech", "M.Tech", "Ph.D"],
                    "specializations": ["AI & ML", "Cybersecurity", "Data Science", "Cloud Computing"]
                },
                {
                    "department": "Information Technology",
                    "programs": ["B.Tech", "M.Tech"],
                    "specializations": ["Software Engineering", "Networking", "Web Technologies"]
                },
                {
                    "department": "Electronics & Communication Engineering",
                    "programs": ["B.Tech", "M.Tech", "Ph.D"],
                    "specializations": ["VLSI", "Communication Systems", "Embedded Systems"]
                },
                {
                    "department": "Mechanical Engineering",
                    "programs": ["B.Tech", "M.Tech", "Ph.D"],
                    "specializations": ["Automotive", "Manufacturing", "Thermal Engineering"]
                },
                {
                    "department": "Civil Engineering",
                    "programs": ["B.Tech", "M.Tech", "Ph.D"],
                    "specializations": ["Structural Engineering", "Environmental Engineering"]
                },
                {
                    "department": "Aerospace Engineering",
                    "programs": ["B.Tech", "M.Tech"],
                    "specializations": ["Aerodynamics", "Aircraft Design"]
                }
            ]
        }),
        "courses" => json!({
            "undergraduate": {
                "b_tech_programs": {
                    "computer_science": {
                        "duration": "4 years",
                        "fees": "Approximately ₹4-5 lakhs per year",
                        "eligibility": "10+2 with Physics, Chemistry, Mathematics with minimum 50% aggregate",
                        "admission": "MET (Manipal Entrance Test) or JEE Main score",
                        "intake": "Around 300-400 students per year"
                    },
                    "information_technology": {
                        "duration": "4 years",
                        "fees": "Approximately ₹4-5 lakhs per year",
                        "eligibility": "10+2 with PCM minimum 50%",
                        "admission": "MET or JEE Main"
                    },
                    "electronics_communication": {
                        "duration": "4 years",
                        "fees": "Approximately ₹4-5 lakhs per year",
                        "eligibility": "10+2 with PCM minimum 50%",
                        "admission": "MET or JEE Main"
                    },
                    "mechanical_engineering": {
                        "duration": "4 years",
                        "fees": "Approximately ₹4-5 lakhs per year",
                        "eligibility": "10+2 with PCM minimum 50%",
                        "admission": "MET or JEE Main"
                    }
                }
            },
            "postgraduate": {
                "m_tech_programs": {
                    "duration": "2 years",
                    "fees": "Approximately ₹2-3 lakhs per year",
                    "eligibility": "B.Tech in relevant field with minimum 60% aggregate",
                    "admission": "GATE score or MET PG"
                },
                "mba": {
                    "duration": "2 years",
                    "fees": "Approximately ₹5-7 lakhs per year",
                    "eligibility": "Bachelor's degree with minimum 50%",
                    "admission": "MAT/CAT/XAT/GMAT score"
                }
            }
        }),
        "hostels" => json!({
            "boys_hostels": {
                "block_1": {
                    "type": "Non-AC Double Occupancy",
                    "fees": "₹80,000 - ₹90,000 per year",
                    "facilities": ["Wi-Fi", "Common Room", "Laundry", "Mess", "Security"]
                },
                "block_2": {
                    "type": "AC Double Occupancy",
                    "fees": "₹1,20,000 - ₹1,40,000 per year",
                    "facilities": ["AC", "Wi-Fi", "Common Room", "Laundry", "Mess", "Security"]
                },
                "block_3": {
                    "type": "Non-AC Single Occupancy",
                    "fees": "₹1,50,000 - ₹1,70,000 per year",
                    "facilities": ["Wi-Fi", "Common Room", "Laundry", "Mess", "Security"]
                }
            },
            "girls_hostels": {
                "block_a": {
                    "type": "Non-AC Double Occupancy",
                    "fees": "₹80,000 - ₹90,000 per year",
                    "facilities": ["Wi-Fi", "Common Room", "Laundry", "Mess", "Security"]
                },
                "block_b": {
                    "type": "AC Double Occupancy",
                    "fees": "₹1,20,000 - ₹1,40,000 per year",
                    "facilities": ["AC", "Wi-Fi", "Common Room", "Laundry", "Mess", "Security"]
                }
            },
            "mess_facilities": {
                "meal_timings": {
                    "breakfast": "7:00 AM - 9:00 AM",
                    "lunch": "12:00 PM - 2:00 PM",
                    "snacks": "4:00 PM - 6:00 PM",
                    "dinner": "7:00 PM - 9:00 PM"
                },
                "mess_fees": "Included in hostel fees",
                "cuisine": "Vegetarian and Non-vegetarian options available"
            },
            "rules": [
                "Hostel gates close at 10:00 PM for girls and 11:00 PM for boys",
                "Visitors need prior permission",
                "Quiet hours from 10:00 PM to 6:00 AM"
            ]
        }),
        "fees" => json!({
            "tuition_fees": {
                "b_tech": {
                    "per_year": "₹4,00,000 - ₹5,00,000",
                    "total_4_years": "₹16,00,000 - ₹20,00,000",
                    "breakdown": {
                        "tuition": "₹3,50,000 - ₹4,50,000",
                        "library": "₹10,000 - ₹15,000",
                        "laboratory": "₹20,000 - ₹30,000",
                        "examination": "₹10,000 - ₹15,000"
                    }
                },
                "m_tech": {
                    "per_year": "₹2,00,000 - ₹3,00,000",
                    "total_2_years": "₹4,00,000 - ₹6,00,000"
                },
                "mba": {
                    "per_year": "₹5,00,000 - ₹7,00,000",
                    "total_2_years": "₹10,00,000 - ₹14,00,000"
                }
            },
            "hostel_fees": {
                "non_ac_double": "₹80,000 - ₹90,000 per year",
                "ac_double": "₹1,20,000 - ₹1,40,000 per year",
                "single_occupancy": "₹1,50,000 - ₹1,70,000 per year"
            },
            "other_fees": {
                "admission_fee": "₹50,000 - ₹1,00,000 (one-time)",
                "security_deposit": "₹25,000 - ₹50,000 (refundable)",
                "medical_insurance": "₹5,000 - ₹10,000 per year"
            },
            "scholarships": {
                "merit_based": "Up to 50% fee waiver based on MET/JEE rank",
                "sports_quota": "Available for exceptional athletes",
                "financial_aid": "Need-based scholarships available"
            },
            "payment_options": [
                "Full payment at admission",
                "Semester-wise payment",
                "Education loans available"
            ]
        }),
        "facilities" => json!({
            "library": {
                "name": "Knowledge Resource Centre",
                "hours": {
                    "weekdays": "8:00 AM - 10:00 PM",
                    "saturday": "9:00 AM - 6:00 PM",
                    "sunday": "10:00 AM - 6:00 PM"
                },
                "collection": {
                    "books": "300,000+",
                    "journals": "1,500+",
                    "e_books": "50,000+",
                    "databases": "Access to IEEE, ACM, Springer, etc."
                },
                "services": [
                    "Book lending (max 5 books for 15 days)",
                    "Research assistance",
                    "Study rooms booking",
                    "24/7 digital library access"
                ]
            },
            "laboratories": {
                "computer_labs": "Multiple labs with latest hardware and software",
                "engineering_labs": "Well-equipped labs for all engineering branches",
                "research_labs": "Advanced research facilities for postgraduate students"
            },
            "sports": {
                "indoor": ["Basketball", "Badminton", "Table Tennis", "Gym", "Squash"],
                "outdoor": ["Cricket", "Football", "Tennis", "Volleyball", "Athletics"],
                "facilities": "Sports complex with courts, fields, and gymnasium"
            },
            "cafeterias": {
                "main_cafeteria": "Multiple food courts serving various cuisines",
                "timings": "7:00 AM - 10:00 PM",
                "cuisine": "Indian, Chinese, Continental, Fast Food"
            },
            "medical": {
                "health_center": "Campus health center with doctors available",
                "ambulance": "24/7 ambulance service"
            },
            "wifi": {
                "coverage": "Campus-wide Wi-Fi coverage",
                "access": "Available 24/7 with student credentials"
            }
        }),
        "admissions" => json!({
            "entrance_exams": {
                "met": {
                    "full_form": "Manipal Entrance Test",
                    "for": "B.Tech, M.Tech, and other programs",
                    "conducted_by": "Manipal Academy of Higher Education",
                    "mode": "Online computer-based test"
                },
                "jee_main": {
                    "accepted": "Yes, for B.Tech programs",
                    "cutoff": "Varies by branch"
                },
                "gate": {
                    "accepted": "Yes, for M.Tech programs",
                    "cutoff": "Minimum 50 percentile"
                }
            },
            "application_process": {
                "step_1": "Register online on the official website",
                "step_2": "Fill the application form",
                "step_3": "Pay the application fee (₹600 - ₹2,000)",
                "step_4": "Appear for the entrance exam",
                "step_5": "Counseling and seat allocation",
                "step_6": "Document verification and fee payment"
            },
            "important_dates": {
                "application_start": "Usually in October-November",
                "application_deadline": "Usually in March-April",
                "exam_date": "Usually in April-May",
                "counseling": "Usually in June-July"
            },
            "contact": {
                "admission_office": "+91 820 292 2400",
                "email": "admissions@manipal.edu",
                "website": "https://manipal.edu/mit"
            }
        }),
        _ => json!({}),
    }
}
