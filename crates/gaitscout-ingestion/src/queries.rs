//! Canonical retrieval queries, one pair per source.
//!
//! Query 1 (system) recalls system/platform development papers; query 2
//! (pipeline) back-fills algorithm-pipeline papers that query 1 misses.
//! Each pair is phrased in the target API's own query syntax.

pub const ARXIV_SYSTEM: &str =
    "(gait OR walking OR stride OR step OR locomotion) \
     AND (system OR platform OR framework OR pipeline OR software OR toolkit \
     OR \"open source\" OR github OR implementation OR real-time \
     OR wearable OR smartphone OR visualization OR dashboard OR GUI \
     OR database OR report) \
     AND submittedDate:[20180101 TO 20261231]";

pub const ARXIV_PIPELINE: &str =
    "(gait OR walking OR stride OR step) \
     AND (\"event detection\" OR segmentation OR preprocessing OR spatiotemporal \
     OR \"stride length\" OR cadence OR kinematics OR \"signal processing\" \
     OR \"feature extraction\" OR validation) \
     AND submittedDate:[20180101 TO 20261231]";

pub const PUBMED_SYSTEM: &str =
    "(gait[Title/Abstract] OR walking[Title/Abstract]) \
     AND (system[Title/Abstract] OR platform[Title/Abstract] OR software[Title/Abstract] \
     OR visualization[Title/Abstract] OR database[Title/Abstract] \
     OR \"real-time\"[Title/Abstract] OR wearable[Title/Abstract]) \
     AND 2018:2026[dp]";

pub const PUBMED_PIPELINE: &str =
    "(gait[Title/Abstract] OR walking[Title/Abstract]) \
     AND (algorithm[Title/Abstract] OR validation[Title/Abstract] \
     OR accuracy[Title/Abstract] OR detection[Title/Abstract]) \
     AND 2018:2026[dp]";

pub const SEMANTIC_SCHOLAR_SYSTEM: &str =
    "(gait OR walking OR stride OR step OR locomotion) \
     AND (system OR platform OR framework OR pipeline OR software OR toolkit \
     OR \"open source\" OR github OR implementation OR real-time \
     OR wearable OR smartphone OR visualization OR dashboard OR GUI \
     OR database OR report)";

pub const SEMANTIC_SCHOLAR_PIPELINE: &str =
    "(gait OR walking OR stride OR step) \
     AND (\"event detection\" OR segmentation OR preprocessing OR spatiotemporal \
     OR \"stride length\" OR cadence OR kinematics OR \"signal processing\" \
     OR \"feature extraction\" OR validation)";
