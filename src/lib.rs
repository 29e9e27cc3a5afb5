pub mod configuration;

pub mod objectwithuuid;

pub mod plannererror;

pub mod optimizer {
    pub mod dateoptimization;
    pub mod leavescanner;
}

pub mod storage {
    pub mod storeddata;
}

pub mod time {
    pub mod utility;
    pub mod rangeofdates;

    pub mod holiday {
        pub mod holiday;
        pub mod weekendmask;
        pub mod weekendadjustment;
    }

    pub mod calendar {
        pub mod holidaycalendar;
        pub mod leavecalendar;
        pub mod workingdayindex;
    }
}

pub mod trip {
    pub mod trip;
    pub mod grouptrip;
    pub mod planningsession;
}
