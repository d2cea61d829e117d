/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Dictionary text shared by the unit tests.

pub(crate) const FIELD_TEXT: &str = "\
!tag Filename  RWF.DAT
!tag Desc      RDFD RWF field set
!tag Type      1
!tag Version   4.20.29
!tag Build     38
!tag Date      19-Mar-2018
!
! ACRONYM    DDE ACRONYM          FID  RIPPLES TO  FIELD TYPE     LENGTH  RWF TYPE   RWF LEN
!
PROD_PERM  \"PERMISSION\"             1  NULL        INTEGER            5  UINT64           2
DSPLY_NAME \"DISPLAY NAME\"           3  NULL        ALPHANUMERIC      16  RMTES_STRING    16
RDN_EXCHID \"IDN EXCHANGE ID\"        4  NULL        ENUMERATED    3 ( 3 )  ENUM             1
BID        \"BID\"                   22  BID_1       PRICE             17  REAL64           7
BID_1      \"BID 1\"                 23  BID_2       PRICE             17  REAL64           7
BID_2      \"BID 2\"                 24  NULL        PRICE             17  REAL64           7
TRADE_DATE \"TRADE DATE\"            16  NULL        DATE              11  DATE             4
";

pub(crate) const ENUM_TEXT: &str = "\
!tag Filename  ENUMTYPE.001
!tag Desc      IDN Marketstream enumerated tables
!tag RT_Version 4.20.29
!tag DT_Version 17.11
!tag Date      13-Aug-2018
!
RDN_EXCHID  4
!
! VALUE  DISPLAY  MEANING
   0     \"   \"    Undefined
   1     \"ASE\"    NYSE AMEX
   2     \"NYS\"    New York Stock Exchange
!
PRCTCK_1  14
   0     \" \"      Undefined
   1     #DE#     Up tick
   2     #FE#     Down tick
";
